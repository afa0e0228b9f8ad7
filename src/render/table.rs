//! Table shaping: collection + configuration -> ordered header and body rows.
//!
//! Nothing here touches the stored order of a collection. Sorting works on a
//! view of borrowed entries so rendering stays a pure function of its inputs.

use std::cmp::Ordering;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{
    Collection, CollectionConfig, CollectionKind, ColumnType, Document, Entry, Icon, Roster,
    SortMode,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    /// Set only on the column the table is sorted by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_mode: Option<SortMode>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Cell {
    Text(String),
    Image(String),
    Html(String),
    Icons(Vec<Icon>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub entry_id: u64,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowSet {
    pub table_id: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Row>,
    /// Every column is hidden; the table itself should not be drawn
    pub hidden: bool,
}

/// Render the collection `kind` of `document`.
pub fn render_collection(document: &Document, kind: CollectionKind) -> RowSet {
    let roster = document.roster();
    match kind {
        CollectionKind::Users => render(kind, &document.users, &roster),
        CollectionKind::Roles => render(kind, &document.roles, &roster),
        CollectionKind::Events => render(kind, &document.events, &roster),
    }
}

/// Shape `collection` into rows according to its configuration.
pub fn render<T: Entry>(
    kind: CollectionKind,
    collection: &Collection<T>,
    roster: &Roster<'_>,
) -> RowSet {
    let config = &collection.config;
    let visible: Vec<_> = config.visible_headers().collect();
    let icon_column = visible.iter().rposition(|h| h.kind == ColumnType::Array);

    let headers = visible
        .iter()
        .map(|h| HeaderCell {
            name: h.name.clone(),
            label: h.label.clone(),
            kind: h.kind,
            sort_mode: if config.sort.sort_by.as_deref() == Some(h.name.as_str()) {
                config.sort.sort_mode
            } else {
                None
            },
        })
        .collect();

    let rows = sorted(&collection.data, config, roster)
        .into_iter()
        .map(|entry| Row {
            entry_id: entry.id(),
            cells: visible
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    if Some(index) == icon_column {
                        return Cell::Icons(entry.icons(roster));
                    }
                    let value = entry.field(&header.name, roster);
                    match header.kind {
                        ColumnType::Image => Cell::Image(value.to_text()),
                        ColumnType::Html => Cell::Html(value.to_text()),
                        _ => Cell::Text(value.to_text()),
                    }
                })
                .collect(),
        })
        .collect();

    RowSet {
        table_id: kind.table_id(),
        headers,
        rows,
        hidden: config.all_hidden(),
    }
}

/// Entries of `data` in display order.
///
/// Only numeric and text columns sort; anything else (or no sort mode)
/// keeps insertion order. Descending is the reversed ascending order.
pub fn sorted<'a, T: Entry>(
    data: &'a [T],
    config: &CollectionConfig,
    roster: &Roster<'_>,
) -> Vec<&'a T> {
    let mut entries: Vec<&T> = data.iter().collect();

    let (Some(sort_by), Some(mode)) = (config.sort.sort_by.as_deref(), config.sort.sort_mode)
    else {
        return entries;
    };
    let Some(header) = config.header(sort_by).filter(|h| h.kind.is_sortable()) else {
        return entries;
    };

    if header.kind == ColumnType::Numeric {
        entries.sort_by(|a, b| {
            numeric_cmp(
                a.field(sort_by, roster).as_number(),
                b.field(sort_by, roster).as_number(),
            )
        });
    } else {
        entries.sort_by(|a, b| {
            locale_cmp(
                &a.field(sort_by, roster).to_text(),
                &b.field(sort_by, roster).to_text(),
            )
        });
    }

    if mode == SortMode::Desc {
        entries.reverse();
    }
    entries
}

/// Missing values sort before any number.
fn numeric_cmp(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Case-insensitive comparison; on a tie lowercase sorts before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Header click on `field`.
pub fn toggle_sort(config: &mut CollectionConfig, field: &str) -> Result<(), AppError> {
    if config.header(field).is_none() {
        return Err(AppError::Validation(format!("Unknown column '{}'", field)));
    }
    config.sort.toggle(field);
    Ok(())
}
