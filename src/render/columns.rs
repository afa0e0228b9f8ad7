//! Column visibility: context-menu toggles that patch an already drawn table.
//!
//! `ColumnSpec::visible` is the only visibility store, shared with the table renderer.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{CollectionConfig, CollectionKind};

/// Show/hide instruction for every cell of one column.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    pub table_id: String,
    pub column_index: usize,
    pub visible: bool,
    pub table_hidden: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub index: usize,
    pub label: String,
    pub visible: bool,
}

/// A checklist of every declared column, positioned at the click.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMenu {
    pub table_id: String,
    pub x: i32,
    pub y: i32,
    pub items: Vec<MenuItem>,
    pub reset_offered: bool,
}

pub fn open_menu(kind: CollectionKind, config: &CollectionConfig, x: i32, y: i32) -> ColumnMenu {
    ColumnMenu {
        table_id: kind.table_id(),
        x,
        y,
        items: config
            .headers
            .iter()
            .enumerate()
            .map(|(index, h)| MenuItem {
                index,
                label: h.label.clone(),
                visible: h.visible,
            })
            .collect(),
        reset_offered: config.all_hidden(),
    }
}

/// Set the visibility of the declared column at `column_index`.
pub fn toggle_column(
    kind: CollectionKind,
    config: &mut CollectionConfig,
    column_index: usize,
    visible: bool,
) -> Result<ColumnPatch, AppError> {
    let header = config.headers.get_mut(column_index).ok_or_else(|| {
        AppError::NotFound(format!(
            "Column {} not found in {}",
            column_index,
            kind.as_str()
        ))
    })?;
    header.visible = visible;

    Ok(ColumnPatch {
        table_id: kind.table_id(),
        column_index,
        visible,
        table_hidden: config.all_hidden(),
    })
}

/// Make every column visible again.
pub fn reset_columns(kind: CollectionKind, config: &mut CollectionConfig) -> Vec<ColumnPatch> {
    for header in &mut config.headers {
        header.visible = true;
    }

    (0..config.headers.len())
        .map(|column_index| ColumnPatch {
            table_id: kind.table_id(),
            column_index,
            visible: true,
            table_hidden: false,
        })
        .collect()
}
