//! Table endpoints: rows, header sorting and the column menu.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{dispatched, parse_collection, render_at, success, ApiResult};
use crate::render::columns::{self, ColumnMenu};
use crate::render::table::{self, RowSet};
use crate::state::{Action, Dispatched};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub field: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

#[derive(Debug, Deserialize)]
pub struct ColumnVisibilityRequest {
    pub visible: bool,
}

/// GET /api/tables/:collection - Header and rows in display order.
pub async fn get_table(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<RowSet> {
    let (rows, revision_id) = render_at(&state, &collection, table::render_collection).await?;
    success(rows, revision_id)
}

/// POST /api/tables/:collection/sort - Header click.
pub async fn sort_table(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(request): Json<SortRequest>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    let kind = parse_collection(&collection, revision_id)?;

    dispatched(
        state
            .shared
            .dispatch(Action::ToggleSort {
                collection: kind,
                field: request.field,
            })
            .await,
        revision_id,
    )
}

/// GET /api/tables/:collection/columns - Context menu listing every column.
pub async fn column_menu(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<ColumnMenu> {
    let (menu, revision_id) = render_at(&state, &collection, |document, kind| {
        columns::open_menu(kind, document.config(kind), query.x, query.y)
    })
    .await?;
    success(menu, revision_id)
}

/// PUT /api/tables/:collection/columns/:index - Show or hide one column.
pub async fn set_column_visibility(
    State(state): State<AppState>,
    Path((collection, index)): Path<(String, usize)>,
    Json(request): Json<ColumnVisibilityRequest>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    let kind = parse_collection(&collection, revision_id)?;

    dispatched(
        state
            .shared
            .dispatch(Action::ToggleColumn {
                collection: kind,
                index,
                visible: request.visible,
            })
            .await,
        revision_id,
    )
}

/// POST /api/tables/:collection/columns/reset - Show every column again.
pub async fn reset_columns(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Dispatched> {
    let revision_id = state.shared.revision_id().await;
    let kind = parse_collection(&collection, revision_id)?;

    dispatched(
        state.shared.dispatch(Action::ResetColumns(kind)).await,
        revision_id,
    )
}
