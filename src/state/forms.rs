//! Reading submitted form fields back into the document.
//!
//! Each apply resolves and validates every field before the first write, so a
//! rejected submission leaves the document exactly as it was.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use super::modal::ModalMode;
use crate::errors::AppError;
use crate::models::{CollectionKind, Document, Event, Role, User, DEFAULT_ICON, ICONS};

/// Submitted form values keyed by field name.
pub type FormFields = HashMap<String, String>;

fn field<'a>(fields: &'a FormFields, name: &str) -> &'a str {
    fields.get(name).map(|v| v.trim()).unwrap_or_default()
}

/// Apply a submitted form. Returns the views that need re-rendering.
pub fn apply(
    document: &mut Document,
    target: CollectionKind,
    mode: ModalMode,
    fields: &FormFields,
) -> Result<Vec<CollectionKind>, AppError> {
    match target {
        CollectionKind::Users => apply_user(document, mode, fields),
        CollectionKind::Roles => apply_role(document, mode, fields),
        CollectionKind::Events => apply_event(document, mode, fields),
    }
}

fn missing(kind: CollectionKind, id: u64) -> AppError {
    AppError::NotFound(format!("Entry {} not found in {}", id, kind.as_str()))
}

fn apply_user(
    document: &mut Document,
    mode: ModalMode,
    fields: &FormFields,
) -> Result<Vec<CollectionKind>, AppError> {
    let name = field(fields, "name").to_string();

    let role = field(fields, "role");
    let role_id = if role.is_empty() {
        None
    } else {
        let found = document
            .roles
            .data
            .iter()
            .find(|r| r.name == role)
            .ok_or_else(|| AppError::Validation(format!("Unknown role '{}'", role)))?;
        Some(found.id)
    };

    let current_pic = match mode {
        ModalMode::Edit { id } => Some(
            document
                .users
                .find(id)
                .ok_or_else(|| missing(CollectionKind::Users, id))?
                .pic
                .clone(),
        ),
        ModalMode::Create => None,
    };
    let pic = match field(fields, "pic") {
        "" => DEFAULT_ICON.to_string(),
        p if ICONS.contains(&p) || current_pic.as_deref() == Some(p) => p.to_string(),
        p => return Err(AppError::Validation(format!("Unknown icon '{}'", p))),
    };

    match mode {
        ModalMode::Create => {
            let id = document.users.allocate_id()?;
            document.users.data.push(User {
                id,
                name,
                role_id,
                pic,
            });
            tracing::info!("Created user {}", id);
        }
        ModalMode::Edit { id } => {
            let user = document
                .users
                .find_mut(id)
                .ok_or_else(|| missing(CollectionKind::Users, id))?;
            user.name = name;
            user.role_id = role_id;
            user.pic = pic;
            tracing::info!("Updated user {}", id);
        }
    }

    Ok(CollectionKind::ALL.to_vec())
}

fn apply_role(
    document: &mut Document,
    mode: ModalMode,
    fields: &FormFields,
) -> Result<Vec<CollectionKind>, AppError> {
    let name = field(fields, "name").to_string();
    let description = field(fields, "description").to_string();

    let editing = match mode {
        ModalMode::Edit { id } => Some(id),
        ModalMode::Create => None,
    };
    if !name.is_empty()
        && document
            .roles
            .data
            .iter()
            .any(|r| r.name == name && Some(r.id) != editing)
    {
        return Err(AppError::Validation(format!("A role named '{}' already exists", name)));
    }

    let mut members = HashSet::new();
    for member in field(fields, "members")
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        let named: Vec<u64> = document
            .users
            .data
            .iter()
            .filter(|u| u.name == member)
            .map(|u| u.id)
            .collect();
        if named.is_empty() {
            return Err(AppError::Validation(format!("Unknown member '{}'", member)));
        }
        members.extend(named);
    }

    let role_id = match mode {
        ModalMode::Create => {
            let id = document.roles.allocate_id()?;
            document.roles.data.push(Role {
                id,
                name,
                description,
            });
            tracing::info!("Created role {}", id);
            id
        }
        ModalMode::Edit { id } => {
            let role = document
                .roles
                .find_mut(id)
                .ok_or_else(|| missing(CollectionKind::Roles, id))?;
            role.name = name;
            role.description = description;
            tracing::info!("Updated role {}", id);
            id
        }
    };

    resync_members(document, role_id, &members);
    Ok(vec![CollectionKind::Roles, CollectionKind::Users])
}

/// Point exactly the users in `members` at the role: previous members that
/// were not named lose it, named users gain it.
fn resync_members(document: &mut Document, role_id: u64, members: &HashSet<u64>) {
    for user in &mut document.users.data {
        if members.contains(&user.id) {
            user.role_id = Some(role_id);
        } else if user.role_id == Some(role_id) {
            user.role_id = None;
        }
    }
}

fn apply_event(
    document: &mut Document,
    mode: ModalMode,
    fields: &FormFields,
) -> Result<Vec<CollectionKind>, AppError> {
    let raw_user = field(fields, "userId");
    let user_id: u64 = raw_user
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid user id '{}'", raw_user)))?;
    if !document.users.contains(user_id) {
        return Err(AppError::Validation(format!("Unknown user {}", user_id)));
    }
    let content = field(fields, "content").to_string();

    match mode {
        ModalMode::Create => {
            let id = document.events.allocate_id()?;
            document.events.data.push(Event {
                id,
                user_id,
                content,
                date: Utc::now().timestamp_millis(),
                read_by: 0,
            });
            tracing::info!("Created event {}", id);
        }
        ModalMode::Edit { id } => {
            let event = document
                .events
                .find_mut(id)
                .ok_or_else(|| missing(CollectionKind::Events, id))?;
            event.user_id = user_id;
            event.content = content;
            tracing::info!("Updated event {}", id);
        }
    }

    Ok(vec![CollectionKind::Events])
}

/// Remove an entry by id. Deleting a role also clears it from its members.
pub fn delete(
    document: &mut Document,
    kind: CollectionKind,
    id: u64,
) -> Result<Vec<CollectionKind>, AppError> {
    let removed = match kind {
        CollectionKind::Users => document.users.remove(id),
        CollectionKind::Roles => document.roles.remove(id),
        CollectionKind::Events => document.events.remove(id),
    };
    if !removed {
        return Err(missing(kind, id));
    }
    tracing::info!("Deleted {} entry {}", kind.as_str(), id);

    Ok(match kind {
        CollectionKind::Users => CollectionKind::ALL.to_vec(),
        CollectionKind::Roles => {
            resync_members(document, id, &HashSet::new());
            vec![CollectionKind::Roles, CollectionKind::Users]
        }
        CollectionKind::Events => vec![CollectionKind::Events],
    })
}
