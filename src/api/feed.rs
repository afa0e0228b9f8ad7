//! Event feed endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{dispatched, success, ApiResult};
use crate::models::SortMode;
use crate::render::feed::{self, FeedItem, FeedSortField};
use crate::state::{Action, Dispatched};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSortRequest {
    pub sort_by: FeedSortField,
    #[serde(default)]
    pub sort_mode: Option<SortMode>,
}

/// GET /api/feed - Events joined to their authors.
pub async fn get_feed(State(state): State<AppState>) -> ApiResult<Vec<FeedItem>> {
    let (items, revision_id) = state
        .shared
        .read(|team| {
            let document = team.document();
            (
                feed::render(&document.events, &document.roster()),
                document.revision_id,
            )
        })
        .await;
    success(items, revision_id)
}

/// PUT /api/feed/sort - Change the feed ordering.
pub async fn set_feed_sort(
    State(state): State<AppState>,
    Json(request): Json<FeedSortRequest>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    dispatched(
        state
            .shared
            .dispatch(Action::SetFeedSort {
                field: request.sort_by,
                mode: request.sort_mode.unwrap_or(SortMode::Asc),
            })
            .await,
        revision_id,
    )
}
