//! User model.

use serde::{Deserialize, Serialize};

use super::{Entry, FieldValue, Icon, Roster};

/// Icon used when a user is created without choosing one.
pub const DEFAULT_ICON: &str = "img/user.svg";

/// Icons a user may pick from.
pub const ICONS: &[&str] = &[
    "img/user.svg",
    "img/user-male-1.svg",
    "img/user-male-2.svg",
    "img/user-male-3.svg",
    "img/user-male-4.svg",
    "img/user-male-5.svg",
    "img/user-female-1.svg",
    "img/user-female-2.svg",
    "img/user-female-3.svg",
    "img/user-artist.svg",
    "img/user-boss.svg",
];

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// A member of the team roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub role_id: Option<u64>,
    #[serde(default = "default_icon")]
    pub pic: String,
}

impl User {
    pub fn icon(&self) -> Icon {
        Icon {
            pic: self.pic.clone(),
            name: self.name.clone(),
        }
    }
}

impl Entry for User {
    fn id(&self) -> u64 {
        self.id
    }

    fn field(&self, name: &str, roster: &Roster<'_>) -> FieldValue {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "name" => FieldValue::Text(self.name.clone()),
            "role" => self
                .role_id
                .and_then(|id| roster.role_name(id))
                .map(|n| FieldValue::Text(n.to_string()))
                .unwrap_or(FieldValue::Missing),
            "pic" => FieldValue::Text(self.pic.clone()),
            _ => FieldValue::Missing,
        }
    }

    /// A user's icon list is the user itself.
    fn icons(&self, _roster: &Roster<'_>) -> Vec<Icon> {
        vec![self.icon()]
    }
}
