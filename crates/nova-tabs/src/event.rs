//! Tab event fan-out
//!
//! Every structural state change on a tab is broadcast to the tab's
//! listeners in registration order, synchronously. Listeners receive a
//! borrowed event only; they hold no handle back into the owning group, so
//! a callback can never re-enter the group's mutating operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabEventKind {
    TitleChanged,
    MediaStateChanged,
    HibernationChanged,
    Navigated,
    /// Emitted when a refused operation (e.g. hibernating a pinned tab)
    /// is reported instead of applied.
    HibernateRefused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabEvent {
    pub tab_id: String,
    pub kind: TabEventKind,
    /// Event-specific detail: the new title, media state, hibernation flag...
    pub payload: String,
}

impl TabEvent {
    pub fn new(tab_id: impl Into<String>, kind: TabEventKind, payload: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            kind,
            payload: payload.into(),
        }
    }
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&TabEvent) + Send>;

/// Ordered listener registry for a single tab.
#[derive(Default)]
pub struct ListenerSet {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Listener)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TabEvent) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver an event to every listener in registration order.
    pub fn emit(&mut self, event: &TabEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.entries.len())
            .finish()
    }
}
