//! Tab archive
//!
//! A flat archive of closed-out tabs: URL, title, and archival time only.
//! Restoring consumes the record and yields a freshly constructed tab, the
//! same identity-discarding semantics as snapshots.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use nova_tabs::Tab;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedTab {
    pub url: String,
    pub title: String,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct TabArchive {
    entries: Vec<ArchivedTab>,
}

impl TabArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tab's identity. The live tab itself is untouched.
    pub fn archive_tab(&mut self, tab: &Tab) {
        self.entries.push(ArchivedTab {
            url: tab.url.clone(),
            title: tab.title.clone(),
            archived_at: Utc::now(),
        });
        tracing::debug!(title = %tab.title, "Archived tab");
    }

    /// Case-insensitive substring search over titles and URLs.
    pub fn search(&self, query: &str) -> Vec<&ArchivedTab> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&needle)
                    || entry.url.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Remove the record at `index` and build a fresh tab from it. Returns
    /// None when the index is out of range.
    pub fn restore(&mut self, index: usize) -> Option<Tab> {
        if index >= self.entries.len() {
            return None;
        }

        let archived = self.entries.remove(index);
        let mut tab = Tab::new(archived.url);
        tab.set_title(archived.title);
        Some(tab)
    }

    /// Drop records older than the given number of days. Returns how many
    /// were removed.
    pub fn clear_older_than(&mut self, days: i64) -> usize {
        let cutoff = Utc::now() - Duration::days(days);
        let before = self.entries.len();
        self.entries.retain(|entry| entry.archived_at >= cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, days, "Cleared old tab archives");
        }
        removed
    }

    pub fn entries(&self) -> &[ArchivedTab] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
