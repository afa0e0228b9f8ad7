//! Server-drawn HTML views and the icon catalogue.

use axum::{
    extract::{Path, State},
    response::Html,
};

use super::{render_at, success, ApiResult};
use crate::errors::AppErrorWithRevision;
use crate::models::{CollectionKind, ICONS};
use crate::render::{feed, html, table};
use crate::AppState;

/// GET /views/:collection - Users and roles as tables, events as the feed.
pub async fn get_view(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Html<String>, AppErrorWithRevision> {
    let (body, _) = render_at(&state, &collection, |document, kind| match kind {
        CollectionKind::Events => {
            html::feed_html(&feed::render(&document.events, &document.roster()))
        }
        _ => html::table_html(&table::render_collection(document, kind)),
    })
    .await?;
    Ok(Html(body))
}

/// GET /api/icons - Icons a user can pick.
pub async fn list_icons(State(state): State<AppState>) -> ApiResult<Vec<&'static str>> {
    let revision_id = state.shared.revision_id().await;
    success(ICONS.to_vec(), revision_id)
}
