//! Modal form endpoints and deletion of the selected entry.

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{dispatched, ApiResult};
use crate::state::{Action, Dispatched, FormFields};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub fields: FormFields,
}

/// POST /api/modal/open - Open the form for the active view.
///
/// Edits the selected entry when one is selected in that view, otherwise
/// creates a new one.
pub async fn open_modal(State(state): State<AppState>) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(state.shared.dispatch(Action::OpenModal).await, revision_id)
}

/// POST /api/modal/apply - Submit the open form.
pub async fn apply_modal(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(
        state
            .shared
            .dispatch(Action::ApplyModal(request.fields))
            .await,
        revision_id,
    )
}

/// POST /api/modal/cancel - Close the form without changes.
pub async fn cancel_modal(State(state): State<AppState>) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(state.shared.dispatch(Action::CancelModal).await, revision_id)
}

/// POST /api/entries/delete - Delete the selected entry, if any.
pub async fn delete_selected(State(state): State<AppState>) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(
        state.shared.dispatch(Action::DeleteSelected).await,
        revision_id,
    )
}
