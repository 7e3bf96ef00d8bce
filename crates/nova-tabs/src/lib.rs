//! NOVA Tab Entity Model
//!
//! Tabs are stateful entities: they carry navigation history, load/media/
//! importance state, visit metadata, and a per-tab listener list notified on
//! state transitions. Groups own tabs exclusively; a tab belongs to at most
//! one group at a time.

mod error;
mod event;
mod history;
mod state;
mod tab;

pub use error::TabError;
pub use event::{ListenerId, ListenerSet, TabEvent, TabEventKind};
pub use history::{HistoryEntry, NavHistory};
pub use state::{Importance, LoadState, MediaState};
pub use tab::{Tab, TabMetadata, PLACEHOLDER_URL};

pub type Result<T> = std::result::Result<T, TabError>;
