//! Per-collection display configuration: column headers and sort state.

use serde::{Deserialize, Serialize};

/// How a column's values are compared and drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Image,
    Array,
    Html,
    #[default]
    None,
}

impl ColumnType {
    /// Only numeric and text columns take part in sorting.
    pub fn is_sortable(self) -> bool {
        matches!(self, ColumnType::Numeric | ColumnType::Text)
    }
}

/// A single declared column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
    pub visible: bool,
}

impl ColumnSpec {
    pub fn new(name: &str, label: &str, kind: ColumnType, visible: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            visible,
        }
    }
}

/// Sort direction. Absence (`None` in [`SortConfig::sort_mode`]) means unsorted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Asc,
    Desc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Asc => "asc",
            SortMode::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_mode: Option<SortMode>,
}

impl SortConfig {
    pub fn by(field: &str, mode: SortMode) -> Self {
        Self {
            sort_by: Some(field.to_string()),
            sort_mode: Some(mode),
        }
    }

    /// Header click: a new field starts ascending, the same field cycles
    /// `none -> asc -> desc -> none`.
    pub fn toggle(&mut self, field: &str) {
        if self.sort_by.as_deref() != Some(field) {
            self.sort_by = Some(field.to_string());
            self.sort_mode = Some(SortMode::Asc);
            return;
        }

        self.sort_mode = match self.sort_mode {
            None => Some(SortMode::Asc),
            Some(SortMode::Asc) => Some(SortMode::Desc),
            Some(SortMode::Desc) => None,
        };
    }
}

/// Headers (declared order) plus sort state of one collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    #[serde(default)]
    pub headers: Vec<ColumnSpec>,
    #[serde(default)]
    pub sort: SortConfig,
}

impl CollectionConfig {
    pub fn header(&self, name: &str) -> Option<&ColumnSpec> {
        self.headers.iter().find(|h| h.name == name)
    }

    /// Visible headers in declared order.
    pub fn visible_headers(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.headers.iter().filter(|h| h.visible)
    }

    pub fn all_hidden(&self) -> bool {
        self.headers.iter().all(|h| !h.visible)
    }
}
