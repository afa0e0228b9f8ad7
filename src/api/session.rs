//! Navigation and selection endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{dispatched, success, ApiResult};
use crate::state::{Action, Component, Dispatched, Selection, Snapshot};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub component: Component,
}

/// GET /api/state - Active view, selection and modal state.
pub async fn get_state(State(state): State<AppState>) -> ApiResult<Snapshot> {
    let snapshot = state.shared.read(|team| team.snapshot()).await;
    let revision_id = snapshot.revision_id;
    success(snapshot, revision_id)
}

/// POST /api/navigate - Switch the active view.
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    tracing::debug!("Navigating to {:?}", request.component);

    dispatched(
        state
            .shared
            .dispatch(Action::Navigate(request.component))
            .await,
        revision_id,
    )
}

/// POST /api/select - Remember the clicked entry.
pub async fn select(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(
        state.shared.dispatch(Action::Select(selection)).await,
        revision_id,
    )
}
