//! Document API endpoints: export, revision, import and clear.

use axum::extract::{Query, State};

use super::{dispatched, error, success, ApiResult, ConfirmQuery};
use crate::errors::AppError;
use crate::models::{Document, RevisionInfo};
use crate::state::Dispatched;
use crate::AppState;

/// GET /api/document - Export the full document.
pub async fn get_document(State(state): State<AppState>) -> ApiResult<Document> {
    let document = state.shared.read(|team| team.document().clone()).await;
    let revision_id = document.revision_id;
    success(document, revision_id)
}

/// GET /api/document/revision - Revision of the stored document.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let current = state
        .shared
        .read(|team| RevisionInfo::from(team.document()))
        .await;

    match state.shared.store().revision().await {
        Ok(Some(info)) => {
            let revision_id = info.revision_id;
            success(info, revision_id)
        }
        Ok(None) => {
            let revision_id = current.revision_id;
            success(current, revision_id)
        }
        Err(e) => error(e, current.revision_id),
    }
}

/// POST /api/document/import?confirm=true - Replace all data with the body.
pub async fn import_document(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
    body: String,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;

    if !query.confirm {
        return error(
            AppError::ConfirmationRequired("Importing replaces all existing data".to_string()),
            revision_id,
        );
    }

    tracing::info!("Importing into '{}'", state.config.storage_key);
    dispatched(state.shared.import(&body).await, revision_id)
}

/// DELETE /api/document?confirm=true - Clear all data.
pub async fn clear_document(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;

    if !query.confirm {
        return error(
            AppError::ConfirmationRequired("Clearing deletes all existing data".to_string()),
            revision_id,
        );
    }

    tracing::warn!("Clearing all data stored under '{}'", state.config.storage_key);
    dispatched(state.shared.clear().await, revision_id)
}
