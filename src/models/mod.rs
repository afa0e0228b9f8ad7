//! Data models for the TeamOrg application.
//!
//! Wire names are camelCase to match the persisted document layout.

mod columns;
mod document;
mod entry;
mod event;
mod role;
mod user;

pub use columns::*;
pub use document::*;
pub use entry::*;
pub use event::*;
pub use role::*;
pub use user::*;
