//! Field access shared by every collection entry.

use serde::{Deserialize, Serialize};

use super::{Role, User};

/// A field value read by column name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Missing,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text form used for text comparison and plain cells.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Missing => String::new(),
        }
    }
}

/// An icon with a caption, e.g. a user's picture and name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Icon {
    pub pic: String,
    pub name: String,
}

/// Read-only view over the users and roles, used to resolve relations.
#[derive(Debug, Clone, Copy)]
pub struct Roster<'a> {
    pub users: &'a [User],
    pub roles: &'a [Role],
}

impl<'a> Roster<'a> {
    pub fn new(users: &'a [User], roles: &'a [Role]) -> Self {
        Self { users, roles }
    }

    pub fn user(&self, id: u64) -> Option<&'a User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn role_name(&self, id: u64) -> Option<&'a str> {
        self.roles
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }

    /// Users currently assigned to the role, in roster order.
    pub fn members_of(&self, role_id: u64) -> impl Iterator<Item = &'a User> + 'a {
        self.users
            .iter()
            .filter(move |u| u.role_id == Some(role_id))
    }
}

/// A record of a collection that the table renderer can draw.
pub trait Entry {
    fn id(&self) -> u64;

    /// Value of the column named `name`; `Missing` for unknown columns.
    fn field(&self, name: &str, roster: &Roster<'_>) -> FieldValue;

    /// Icon list drawn in place of the last visible array column.
    fn icons(&self, roster: &Roster<'_>) -> Vec<Icon>;
}
