//! The persisted document: three collections and their display configuration.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{
    CollectionConfig, ColumnSpec, ColumnType, Entry, Event, Role, Roster, SortConfig, SortMode,
    User,
};
use crate::errors::AppError;

/// Current document layout. Documents carrying any other version are rejected.
pub const SCHEMA_VERSION: i32 = 1;

/// The three record sets of the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Users,
    Roles,
    Events,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Users,
        CollectionKind::Roles,
        CollectionKind::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Users => "users",
            CollectionKind::Roles => "roles",
            CollectionKind::Events => "events",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "users" => Some(CollectionKind::Users),
            "roles" => Some(CollectionKind::Roles),
            "events" => Some(CollectionKind::Events),
            _ => None,
        }
    }

    /// DOM id of the table drawing this collection.
    pub fn table_id(&self) -> String {
        format!("{}-table", self.as_str())
    }
}

/// One record set with its configuration and id counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    #[serde(default)]
    pub config: CollectionConfig,
    /// Next id to hand out; only ever grows
    #[serde(default)]
    pub next_id: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T: Entry> Collection<T> {
    pub fn with_headers(headers: Vec<ColumnSpec>) -> Self {
        Self {
            config: CollectionConfig {
                headers,
                sort: SortConfig::by("id", SortMode::Asc),
            },
            next_id: 0,
            data: Vec::new(),
        }
    }

    /// Hand out the next id. Fails once the counter is exhausted, leaving it
    /// unchanged.
    pub fn allocate_id(&mut self) -> Result<u64, AppError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| AppError::Validation("No ids left to allocate".to_string()))?;
        Ok(id)
    }

    pub fn find(&self, id: u64) -> Option<&T> {
        self.data.iter().find(|e| e.id() == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut T> {
        self.data.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.find(id).is_some()
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.data.len();
        self.data.retain(|e| e.id() != id);
        self.data.len() != before
    }

    fn validate(&self, kind: CollectionKind) -> Result<(), AppError> {
        if self.next_id == u64::MAX {
            return Err(AppError::CorruptDocument(format!(
                "{}: nextId {} leaves no ids to allocate",
                kind.as_str(),
                self.next_id
            )));
        }

        let mut names = HashSet::new();
        for header in &self.config.headers {
            if !names.insert(header.name.as_str()) {
                return Err(AppError::CorruptDocument(format!(
                    "{}: duplicate header '{}'",
                    kind.as_str(),
                    header.name
                )));
            }
        }

        let mut ids = HashSet::new();
        for entry in &self.data {
            let id = entry.id();
            if !ids.insert(id) {
                return Err(AppError::CorruptDocument(format!(
                    "{}: duplicate id {}",
                    kind.as_str(),
                    id
                )));
            }
            if id >= self.next_id {
                return Err(AppError::CorruptDocument(format!(
                    "{}: id {} is not below nextId {}",
                    kind.as_str(),
                    id,
                    self.next_id
                )));
            }
        }
        Ok(())
    }
}

/// The root document holding all application data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub schema_version: i32,
    #[serde(default)]
    pub revision_id: i64,
    #[serde(default)]
    pub generated_at: String,
    pub users: Collection<User>,
    pub roles: Collection<Role>,
    pub events: Collection<Event>,
}

impl Default for Document {
    fn default() -> Self {
        use ColumnType::*;

        Self {
            schema_version: SCHEMA_VERSION,
            revision_id: 0,
            generated_at: Utc::now().to_rfc3339(),
            users: Collection::with_headers(vec![
                ColumnSpec::new("id", "id", Numeric, false),
                ColumnSpec::new("name", "Name", Text, true),
                ColumnSpec::new("role", "Role", Text, true),
                ColumnSpec::new("pic", "User", Array, true),
            ]),
            roles: Collection::with_headers(vec![
                ColumnSpec::new("id", "id", Numeric, false),
                ColumnSpec::new("name", "Name", Text, true),
                ColumnSpec::new("description", "Description", Text, true),
                ColumnSpec::new("members", "Members", Array, true),
            ]),
            events: Collection::with_headers(vec![
                ColumnSpec::new("id", "id", Numeric, false),
                ColumnSpec::new("userId", "User", Numeric, false),
                ColumnSpec::new("content", "Content", Html, true),
                ColumnSpec::new("date", "Date", Numeric, true),
                ColumnSpec::new("readBy", "Read By", Numeric, true),
            ]),
        }
    }
}

impl Document {
    /// Parse and validate a serialized document. Never returns a raw parse error.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let document: Document = serde_json::from_str(raw)
            .map_err(|e| AppError::CorruptDocument(format!("Unreadable document: {}", e)))?;
        document.validate()?;
        Ok(document)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(AppError::CorruptDocument(format!(
                "Unsupported schema version {} (expected {})",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        if self.revision_id == i64::MAX {
            return Err(AppError::CorruptDocument(format!(
                "revisionId {} cannot advance",
                self.revision_id
            )));
        }
        self.users.validate(CollectionKind::Users)?;
        self.roles.validate(CollectionKind::Roles)?;
        self.events.validate(CollectionKind::Events)?;
        Ok(())
    }

    pub fn roster(&self) -> Roster<'_> {
        Roster::new(&self.users.data, &self.roles.data)
    }

    pub fn config(&self, kind: CollectionKind) -> &CollectionConfig {
        match kind {
            CollectionKind::Users => &self.users.config,
            CollectionKind::Roles => &self.roles.config,
            CollectionKind::Events => &self.events.config,
        }
    }

    pub fn config_mut(&mut self, kind: CollectionKind) -> &mut CollectionConfig {
        match kind {
            CollectionKind::Users => &mut self.users.config,
            CollectionKind::Roles => &mut self.roles.config,
            CollectionKind::Events => &mut self.events.config,
        }
    }

    pub fn contains(&self, kind: CollectionKind, id: u64) -> bool {
        match kind {
            CollectionKind::Users => self.users.contains(id),
            CollectionKind::Roles => self.roles.contains(id),
            CollectionKind::Events => self.events.contains(id),
        }
    }
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}

impl From<&Document> for RevisionInfo {
    fn from(document: &Document) -> Self {
        Self {
            revision_id: document.revision_id,
            generated_at: document.generated_at.clone(),
        }
    }
}
