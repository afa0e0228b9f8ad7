//! REST API module.
//!
//! Every handler answers with the same envelope: `{success, data, revisionId}`
//! on success, `{success, error, revisionId}` otherwise.

mod document;
mod feed;
mod modal;
mod session;
mod tables;
mod views;

pub use document::*;
pub use feed::*;
pub use modal::*;
pub use session::*;
pub use tables::*;
pub use views::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{CollectionKind, Document};
use crate::state::Dispatched;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Answer with the outcome of a dispatched action.
fn dispatched(result: Result<Dispatched, AppError>, revision_id: i64) -> ApiResult<Dispatched> {
    match result {
        Ok(d) => {
            let new_revision = d.revision_id;
            success(d, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// Resolve a collection name taken from the path.
fn parse_collection(name: &str, revision_id: i64) -> Result<CollectionKind, AppErrorWithRevision> {
    CollectionKind::parse(name).ok_or_else(|| unknown_collection(name, revision_id))
}

fn unknown_collection(name: &str, revision_id: i64) -> AppErrorWithRevision {
    AppErrorWithRevision {
        error: AppError::NotFound(format!("Unknown collection '{}'", name)),
        revision_id,
    }
}

/// Render something from the document together with the revision it was
/// rendered at, both under one lock.
async fn render_at<R>(
    state: &AppState,
    collection: &str,
    render: impl FnOnce(&Document, CollectionKind) -> R,
) -> Result<(R, i64), AppErrorWithRevision> {
    let result = state
        .shared
        .read(|team| {
            let document = team.document();
            let revision_id = document.revision_id;
            CollectionKind::parse(collection)
                .map(|kind| (render(document, kind), revision_id))
                .ok_or(revision_id)
        })
        .await;
    result.map_err(|revision_id| unknown_collection(collection, revision_id))
}

/// `?confirm=true` guard of destructive endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}
