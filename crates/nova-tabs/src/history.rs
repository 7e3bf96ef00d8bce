//! Per-tab navigation history
//!
//! Two stacks of (url, title) entries. `go_back`/`go_forward` shuttle the
//! current entry between them; plain navigation only ever pushes onto the
//! back stack.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Back/forward stacks for a single tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavHistory {
    back: Vec<HistoryEntry>,
    forward: Vec<HistoryEntry>,
}

impl NavHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Record the current page before navigating away from it.
    pub fn push_back(&mut self, entry: HistoryEntry) {
        self.back.push(entry);
    }

    /// Pop the previous page, pushing the current one onto the forward stack.
    pub fn step_back(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.back.pop()?;
        self.forward.push(current);
        Some(previous)
    }

    /// Pop the next page, pushing the current one onto the back stack.
    pub fn step_forward(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.forward.pop()?;
        self.back.push(current);
        Some(next)
    }

    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    pub fn forward_len(&self) -> usize {
        self.forward.len()
    }
}
