//! Role model. Membership is derived from `User::role_id`, never stored.

use serde::{Deserialize, Serialize};

use super::{Entry, FieldValue, Icon, Roster};

/// A named role users can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Entry for Role {
    fn id(&self) -> u64 {
        self.id
    }

    fn field(&self, name: &str, roster: &Roster<'_>) -> FieldValue {
        match name {
            "id" => FieldValue::Number(self.id as f64),
            "name" => FieldValue::Text(self.name.clone()),
            "description" => FieldValue::Text(self.description.clone()),
            "members" => FieldValue::List(
                roster
                    .members_of(self.id)
                    .map(|u| u.name.clone())
                    .collect(),
            ),
            _ => FieldValue::Missing,
        }
    }

    fn icons(&self, roster: &Roster<'_>) -> Vec<Icon> {
        roster.members_of(self.id).map(|u| u.icon()).collect()
    }
}
