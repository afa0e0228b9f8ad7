//! Event model for the team feed.

use serde::{Deserialize, Serialize};

use super::{Entry, FieldValue, Icon, Roster};

/// A post in the event feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub user_id: u64,
    /// Trusted HTML, drawn without escaping
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub date: i64,
    #[serde(default)]
    pub read_by: u32,
}

impl Entry for Event {
    fn id(&self) -> u64 {
        self.id
    }

    fn field(&self, name: &str, _roster: &Roster<'_>) -> FieldValue {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "userId" => FieldValue::Number(self.user_id as f64),
            "content" => FieldValue::Text(self.content.clone()),
            "date" => FieldValue::Number(self.date as f64),
            "readBy" => FieldValue::Number(self.read_by as f64),
            _ => FieldValue::Missing,
        }
    }

    fn icons(&self, roster: &Roster<'_>) -> Vec<Icon> {
        roster
            .user(self.user_id)
            .map(|u| vec![u.icon()])
            .unwrap_or_default()
    }
}
