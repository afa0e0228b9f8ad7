//! The single writer: state behind one lock, persisted after every change.

use serde::Serialize;
use tokio::sync::Mutex;

use super::{Action, Outcome, Snapshot, TeamState};
use crate::db::DocumentStore;
use crate::errors::AppError;
use crate::models::Document;

/// Result of a dispatched action together with the revision it produced.
#[derive(Debug, Clone, Serialize)]
pub struct Dispatched {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub state: Snapshot,
    #[serde(skip)]
    pub revision_id: i64,
}

/// `TeamState` shared between handlers and the ticker.
///
/// Holding the lock across dispatch and persist orders every mutation, so
/// handlers and ticks apply one at a time in call order.
pub struct SharedState {
    team: Mutex<TeamState>,
    store: DocumentStore,
}

impl SharedState {
    pub fn new(document: Document, store: DocumentStore) -> Self {
        Self {
            team: Mutex::new(TeamState::new(document)),
            store,
        }
    }

    /// Run `f` against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&TeamState) -> R) -> R {
        let team = self.team.lock().await;
        f(&team)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub async fn revision_id(&self) -> i64 {
        self.read(|team| team.document().revision_id).await
    }

    /// Dispatch `action` and persist if it changed the document. If the write
    /// fails the state is rolled back to what it was before the action.
    pub async fn dispatch(&self, action: Action) -> Result<Dispatched, AppError> {
        let mut team = self.team.lock().await;
        self.dispatch_locked(&mut team, action).await
    }

    /// Like [`dispatch`](Self::dispatch), but builds the action from the
    /// current state while still holding the lock.
    pub async fn dispatch_with(
        &self,
        build: impl FnOnce(&TeamState) -> Action,
    ) -> Result<Dispatched, AppError> {
        let mut team = self.team.lock().await;
        let action = build(&team);
        self.dispatch_locked(&mut team, action).await
    }

    async fn dispatch_locked(
        &self,
        team: &mut TeamState,
        action: Action,
    ) -> Result<Dispatched, AppError> {
        let backup = team.clone();
        let outcome = team.dispatch(action)?;

        if outcome.persist {
            if let Err(e) = self.store.persist(team.document_mut()).await {
                tracing::error!("Failed to persist document, rolling back: {}", e);
                *team = backup;
                return Err(e);
            }
        }

        Ok(Dispatched {
            outcome,
            state: team.snapshot(),
            revision_id: team.document().revision_id,
        })
    }

    /// Replace the document with an imported one. Validation happens before
    /// anything is written.
    pub async fn import(&self, raw: &str) -> Result<Dispatched, AppError> {
        let mut team = self.team.lock().await;
        let document = self.store.import(raw, team.document().revision_id).await?;
        self.dispatch_locked(&mut team, Action::Replace(document)).await
    }

    /// Wipe all data and start from a fresh default document.
    pub async fn clear(&self) -> Result<Dispatched, AppError> {
        let mut team = self.team.lock().await;
        let document = self.store.clear(team.document().revision_id).await?;
        self.dispatch_locked(&mut team, Action::Replace(document)).await
    }
}
