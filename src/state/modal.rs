//! Modal state machine and the form it presents.

use serde::Serialize;

use crate::models::{CollectionKind, Document, ICONS};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ModalMode {
    Create,
    Edit { id: u64 },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        #[serde(flatten)]
        mode: ModalMode,
        target: CollectionKind,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FormField {
    fn new(name: &str, label: &str, placeholder: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            value: value.into(),
            options: Vec::new(),
        }
    }

    fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }
}

/// Everything a client needs to draw the modal.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    pub title: String,
    pub description: String,
    pub target: CollectionKind,
    #[serde(flatten)]
    pub mode: ModalMode,
    pub fields: Vec<FormField>,
}

/// Build the form for `target`; edit mode pre-populates from the entry.
pub fn form_spec(document: &Document, target: CollectionKind, mode: ModalMode) -> FormSpec {
    let editing = matches!(mode, ModalMode::Edit { .. });
    let (noun, fields) = match target {
        CollectionKind::Users => ("User", user_fields(document, mode)),
        CollectionKind::Roles => ("Role", role_fields(document, mode)),
        CollectionKind::Events => ("Event", event_fields(document, mode)),
    };

    let (title, description) = if editing {
        (
            format!("Edit {}", noun),
            format!("Update the {}'s information", noun),
        )
    } else {
        (
            format!("Add new {}", noun),
            format!("Fill in new {}'s information", noun),
        )
    };

    FormSpec {
        title,
        description,
        target,
        mode,
        fields,
    }
}

fn user_fields(document: &Document, mode: ModalMode) -> Vec<FormField> {
    let existing = match mode {
        ModalMode::Edit { id } => document.users.find(id),
        ModalMode::Create => None,
    };
    let role = existing
        .and_then(|u| u.role_id)
        .and_then(|id| document.roster().role_name(id))
        .unwrap_or_default();

    vec![
        FormField::new(
            "name",
            "Name:",
            "User name...",
            existing.map(|u| u.name.clone()).unwrap_or_default(),
        ),
        FormField::new("role", "Role:", "Role name...", role).with_options(
            document
                .roles
                .data
                .iter()
                .map(|r| FieldOption {
                    value: r.name.clone(),
                    label: r.name.clone(),
                })
                .collect(),
        ),
        FormField::new(
            "pic",
            "Icon:",
            "Pick an icon...",
            existing.map(|u| u.pic.clone()).unwrap_or_default(),
        )
        .with_options(
            ICONS
                .iter()
                .map(|icon| FieldOption {
                    value: icon.to_string(),
                    label: icon.to_string(),
                })
                .collect(),
        ),
    ]
}

fn role_fields(document: &Document, mode: ModalMode) -> Vec<FormField> {
    let existing = match mode {
        ModalMode::Edit { id } => document.roles.find(id),
        ModalMode::Create => None,
    };
    let members = existing
        .map(|r| {
            document
                .roster()
                .members_of(r.id)
                .map(|u| u.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    vec![
        FormField::new(
            "name",
            "Name:",
            "Role name...",
            existing.map(|r| r.name.clone()).unwrap_or_default(),
        ),
        FormField::new(
            "description",
            "Description:",
            "What the role is for...",
            existing.map(|r| r.description.clone()).unwrap_or_default(),
        ),
        FormField::new("members", "Members:", "Comma separated user names...", members),
    ]
}

fn event_fields(document: &Document, mode: ModalMode) -> Vec<FormField> {
    let existing = match mode {
        ModalMode::Edit { id } => document.events.find(id),
        ModalMode::Create => None,
    };

    vec![
        FormField::new(
            "userId",
            "User:",
            "Author...",
            existing.map(|e| e.user_id.to_string()).unwrap_or_default(),
        )
        .with_options(
            document
                .users
                .data
                .iter()
                .map(|u| FieldOption {
                    value: u.id.to_string(),
                    label: u.name.clone(),
                })
                .collect(),
        ),
        FormField::new(
            "content",
            "Content:",
            "What happened...",
            existing.map(|e| e.content.clone()).unwrap_or_default(),
        ),
    ]
}
