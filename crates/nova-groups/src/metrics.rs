//! Group aggregate metrics
//!
//! Counters are recomputed by a full scan after every membership or
//! state-affecting operation rather than tracked incrementally. At
//! browser-tab scale the scan is cheap and it keeps every public call
//! boundary trivially consistent.

use chrono::{DateTime, Duration, Utc};
use nova_tabs::Tab;

#[derive(Debug, Clone)]
pub struct GroupMetrics {
    pub total_tabs: usize,
    pub active_tabs: usize,
    pub hibernated_tabs: usize,
    pub last_accessed: DateTime<Utc>,
    pub total_focus_time: Duration,
}

impl GroupMetrics {
    pub fn new() -> Self {
        Self {
            total_tabs: 0,
            active_tabs: 0,
            hibernated_tabs: 0,
            last_accessed: Utc::now(),
            total_focus_time: Duration::zero(),
        }
    }

    /// Full-scan recomputation over current membership.
    pub fn recompute(&mut self, tabs: &[Tab]) {
        self.total_tabs = tabs.len();
        self.active_tabs = tabs.iter().filter(|tab| tab.active).count();
        self.hibernated_tabs = tabs.iter().filter(|tab| tab.hibernated).count();
    }

    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }

    pub fn record_focus_time(&mut self, duration: Duration) {
        self.total_focus_time += duration;
    }
}

impl Default for GroupMetrics {
    fn default() -> Self {
        Self::new()
    }
}
