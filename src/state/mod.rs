//! Application state container.
//!
//! `TeamState` owns the document together with the UI state (active view,
//! selection, modal). Every change goes through [`TeamState::dispatch`], which
//! reports what must be persisted and re-rendered instead of doing it itself.

pub mod forms;
pub mod modal;
mod shared;

pub use forms::FormFields;
pub use modal::{FormSpec, ModalMode, ModalState};
pub use shared::*;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{CollectionKind, Document, SortMode};
use crate::render::{columns, feed, table};

/// The main views of the app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    #[default]
    Home,
    Users,
    Roles,
    Events,
}

impl Component {
    /// The collection shown by this view; the home view has none.
    pub fn collection(&self) -> Option<CollectionKind> {
        match self {
            Component::Home => None,
            Component::Users => Some(CollectionKind::Users),
            Component::Roles => Some(CollectionKind::Roles),
            Component::Events => Some(CollectionKind::Events),
        }
    }
}

/// The entry most recently clicked in a table or the feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub collection: CollectionKind,
    pub id: u64,
}

#[derive(Debug, Clone)]
pub enum Action {
    Navigate(Component),
    Select(Selection),
    ToggleSort {
        collection: CollectionKind,
        field: String,
    },
    SetFeedSort {
        field: feed::FeedSortField,
        mode: SortMode,
    },
    ToggleColumn {
        collection: CollectionKind,
        index: usize,
        visible: bool,
    },
    ResetColumns(CollectionKind),
    OpenModal,
    ApplyModal(FormFields),
    CancelModal,
    DeleteSelected,
    /// One step per event, in stored order
    TickReadBy(Vec<u32>),
    /// The document was replaced wholesale (import or clear)
    Replace(Document),
}

/// What a dispatched action changed.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(skip)]
    pub persist: bool,
    pub rerender: Vec<CollectionKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<columns::ColumnPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormSpec>,
}

impl Outcome {
    fn changed(rerender: Vec<CollectionKind>) -> Self {
        Self {
            persist: true,
            rerender,
            ..Self::default()
        }
    }
}

/// Read-only view of the UI state.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub active: Component,
    pub selection: Option<Selection>,
    pub modal: ModalState,
    pub revision_id: i64,
}

/// Upper bound of the read-by counter before it wraps to zero.
pub const READ_BY_LIMIT: u32 = 1000;

#[derive(Debug, Clone)]
pub struct TeamState {
    document: Document,
    active: Component,
    selection: Option<Selection>,
    modal: ModalState,
}

impl TeamState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            active: Component::default(),
            selection: None,
            modal: ModalState::Closed,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active: self.active,
            selection: self.selection,
            modal: self.modal,
            revision_id: self.document.revision_id,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, AppError> {
        match action {
            Action::Navigate(component) => {
                self.active = component;
                self.selection = None;
                self.modal = ModalState::Closed;
                Ok(Outcome {
                    rerender: component.collection().into_iter().collect(),
                    ..Outcome::default()
                })
            }
            Action::Select(selection) => {
                if !self.document.contains(selection.collection, selection.id) {
                    return Err(AppError::NotFound(format!(
                        "Entry {} not found in {}",
                        selection.id,
                        selection.collection.as_str()
                    )));
                }
                self.selection = Some(selection);
                Ok(Outcome::default())
            }
            Action::ToggleSort { collection, field } => {
                table::toggle_sort(self.document.config_mut(collection), &field)?;
                Ok(Outcome::changed(vec![collection]))
            }
            Action::SetFeedSort { field, mode } => {
                feed::set_feed_sort(&mut self.document.events.config, field, mode);
                Ok(Outcome::changed(vec![CollectionKind::Events]))
            }
            Action::ToggleColumn {
                collection,
                index,
                visible,
            } => {
                let patch = columns::toggle_column(
                    collection,
                    self.document.config_mut(collection),
                    index,
                    visible,
                )?;
                Ok(Outcome {
                    persist: true,
                    patches: vec![patch],
                    ..Outcome::default()
                })
            }
            Action::ResetColumns(collection) => {
                let patches =
                    columns::reset_columns(collection, self.document.config_mut(collection));
                Ok(Outcome {
                    persist: true,
                    patches,
                    ..Outcome::default()
                })
            }
            Action::OpenModal => self.open_modal(),
            Action::ApplyModal(fields) => self.apply_modal(&fields),
            Action::CancelModal => {
                self.modal = ModalState::Closed;
                Ok(Outcome::default())
            }
            Action::DeleteSelected => {
                let Some(selection) = self.selection else {
                    return Ok(Outcome::default());
                };
                let rerender =
                    forms::delete(&mut self.document, selection.collection, selection.id)?;
                self.selection = None;
                self.modal = ModalState::Closed;
                Ok(Outcome::changed(rerender))
            }
            Action::TickReadBy(steps) => {
                if self.document.events.data.is_empty() {
                    return Ok(Outcome::default());
                }
                for (event, step) in self.document.events.data.iter_mut().zip(steps) {
                    event.read_by = event.read_by.saturating_add(step);
                    if event.read_by > READ_BY_LIMIT {
                        event.read_by = 0;
                    }
                }
                Ok(Outcome::changed(vec![CollectionKind::Events]))
            }
            Action::Replace(document) => {
                self.document = document;
                self.selection = None;
                self.modal = ModalState::Closed;
                Ok(Outcome {
                    rerender: CollectionKind::ALL.to_vec(),
                    ..Outcome::default()
                })
            }
        }
    }

    fn open_modal(&mut self) -> Result<Outcome, AppError> {
        let target = self
            .active
            .collection()
            .ok_or_else(|| AppError::BadRequest("The home view has no entries".to_string()))?;

        let mode = match self.selection {
            Some(selection) if selection.collection == target => {
                ModalMode::Edit { id: selection.id }
            }
            _ => ModalMode::Create,
        };
        self.modal = ModalState::Open { mode, target };

        Ok(Outcome {
            form: Some(modal::form_spec(&self.document, target, mode)),
            ..Outcome::default()
        })
    }

    fn apply_modal(&mut self, fields: &FormFields) -> Result<Outcome, AppError> {
        let ModalState::Open { mode, target } = self.modal else {
            return Err(AppError::BadRequest("No form is open".to_string()));
        };

        let rerender = forms::apply(&mut self.document, target, mode, fields)?;
        self.modal = ModalState::Closed;
        self.selection = None;
        Ok(Outcome::changed(rerender))
    }
}
