//! Tab entity
//!
//! A mutable record of one browsing surface: URL, title, load/media/
//! importance state, pinned/active/hibernated flags, visit metadata, and
//! back/forward navigation stacks. The engine manages metadata and
//! lifecycle only; it never fetches or renders anything, so navigation
//! completes synchronously (Loading -> Loaded).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::TabError;
use crate::event::{ListenerId, ListenerSet, TabEvent, TabEventKind};
use crate::history::{HistoryEntry, NavHistory};
use crate::state::{Importance, LoadState, MediaState};
use crate::Result;

/// Neutral URL for freshly created tabs. Never recorded in history and
/// never indexed by domain.
pub const PLACEHOLDER_URL: &str = "about:blank";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabMetadata {
    pub favicon_url: Option<String>,
    pub description: String,
    pub keywords: Vec<String>,
    pub created: DateTime<Utc>,
    pub last_visited: DateTime<Utc>,
    pub visit_count: u32,
    pub custom: HashMap<String, String>,
}

impl TabMetadata {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            favicon_url: None,
            description: String::new(),
            keywords: Vec::new(),
            created: now,
            last_visited: now,
            visit_count: 0,
            custom: HashMap::new(),
        }
    }

    fn record_visit(&mut self) {
        self.last_visited = Utc::now();
        self.visit_count += 1;
    }
}

#[derive(Debug)]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Current URL
    pub url: String,
    /// Page title
    pub title: String,
    pub load_state: LoadState,
    pub media_state: MediaState,
    pub importance: Importance,
    pub active: bool,
    pub pinned: bool,
    pub hibernated: bool,
    pub metadata: TabMetadata,
    pub history: NavHistory,
    listeners: ListenerSet,
}

impl Tab {
    pub fn new(url: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            title: "New Tab".to_string(),
            load_state: LoadState::Unloaded,
            media_state: MediaState::None,
            importance: Importance::Normal,
            active: false,
            pinned: false,
            hibernated: false,
            metadata: TabMetadata::new(now),
            history: NavHistory::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Create a tab on the neutral placeholder page.
    pub fn blank() -> Self {
        Self::new(PLACEHOLDER_URL)
    }

    /// Extract the host component of a `scheme://host/...` URL.
    ///
    /// Total: malformed input and host-less schemes (`about:blank`) yield
    /// an empty string rather than an error.
    pub fn extract_domain(url: &str) -> String {
        Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Navigate to a new URL.
    ///
    /// Pushes the current page onto the back stack (unless it is empty or
    /// the placeholder), completes Loading -> Loaded synchronously, and
    /// records the visit. The forward stack is deliberately NOT cleared:
    /// the source engine leaves it intact on fresh navigation, unlike
    /// conventional browser semantics, and that behavior is preserved.
    pub fn navigate(&mut self, new_url: impl Into<String>) {
        if !self.url.is_empty() && self.url != PLACEHOLDER_URL {
            self.history
                .push_back(HistoryEntry::new(self.url.clone(), self.title.clone()));
        }

        self.url = new_url.into();
        self.load_state = LoadState::Loading;

        tracing::debug!(tab_id = %self.id, url = %self.url, "Navigating");

        // No content fetch in this engine; loading settles immediately.
        self.load_state = LoadState::Loaded;
        self.metadata.record_visit();

        if !self.url.is_empty() && self.url != PLACEHOLDER_URL {
            let domain = Self::extract_domain(&self.url);
            if !domain.is_empty() {
                self.metadata.favicon_url = Some(format!("https://{}/favicon.ico", domain));
            }
        }

        let event = TabEvent::new(&self.id, TabEventKind::Navigated, &self.url);
        self.listeners.emit(&event);
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    /// Step back to the previous page, pushing the current one onto the
    /// forward stack.
    pub fn go_back(&mut self) -> Result<()> {
        let current = HistoryEntry::new(self.url.clone(), self.title.clone());
        let previous = self.history.step_back(current).ok_or(TabError::NoBackHistory)?;

        self.url = previous.url;
        self.title = previous.title;
        self.metadata.record_visit();

        tracing::debug!(tab_id = %self.id, url = %self.url, "Navigated back");
        Ok(())
    }

    /// Step forward to the next page, pushing the current one onto the
    /// back stack.
    pub fn go_forward(&mut self) -> Result<()> {
        let current = HistoryEntry::new(self.url.clone(), self.title.clone());
        let next = self
            .history
            .step_forward(current)
            .ok_or(TabError::NoForwardHistory)?;

        self.url = next.url;
        self.title = next.title;
        self.metadata.record_visit();

        tracing::debug!(tab_id = %self.id, url = %self.url, "Navigated forward");
        Ok(())
    }

    /// Reload the current page. No history or visit-count effect.
    pub fn reload(&mut self) {
        self.load_state = LoadState::Loading;
        self.load_state = LoadState::Loaded;
        tracing::debug!(tab_id = %self.id, url = %self.url, "Reloaded");
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        let event = TabEvent::new(&self.id, TabEventKind::TitleChanged, &self.title);
        self.listeners.emit(&event);
    }

    /// Activate or deactivate the tab. Activating a hibernated tab wakes it
    /// up first: activation implies liveness.
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.metadata.last_visited = Utc::now();
        }

        self.active = active;

        if self.active && self.hibernated {
            // Cannot fail: un-hibernating is always permitted.
            let _ = self.hibernate(false);
        }
    }

    /// Pin or unpin the tab. Pinning a hibernated tab wakes it up, keeping
    /// the pinned-tabs-are-never-hibernated invariant.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;

        if self.pinned && self.hibernated {
            let _ = self.hibernate(false);
        }
    }

    /// Hibernate or wake the tab.
    ///
    /// Hibernating a pinned tab is refused: the refusal is returned to the
    /// caller and broadcast as a `HibernateRefused` event, never escalated.
    pub fn hibernate(&mut self, hibernate: bool) -> Result<()> {
        if hibernate && self.pinned {
            tracing::debug!(tab_id = %self.id, title = %self.title, "Refusing to hibernate pinned tab");
            let event = TabEvent::new(&self.id, TabEventKind::HibernateRefused, &self.title);
            self.listeners.emit(&event);
            return Err(TabError::HibernatePinned(self.title.clone()));
        }

        self.hibernated = hibernate;

        let event = TabEvent::new(
            &self.id,
            TabEventKind::HibernationChanged,
            if hibernate { "hibernated" } else { "restored" },
        );
        self.listeners.emit(&event);
        Ok(())
    }

    pub fn set_media_state(&mut self, state: MediaState) {
        self.media_state = state;
        let event = TabEvent::new(&self.id, TabEventKind::MediaStateChanged, state.as_str());
        self.listeners.emit(&event);
    }

    pub fn set_importance(&mut self, importance: Importance) {
        self.importance = importance;
    }

    /// Raise importance for extra resources.
    pub fn boost(&mut self) {
        self.importance = Importance::High;
    }

    /// Lower importance to reclaim resources.
    pub fn deprioritize(&mut self) {
        self.importance = Importance::Low;
    }

    /// Attach a listener; it will be called for every subsequent event in
    /// registration order.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TabEvent) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Detach a listener. Returns false for an unknown id.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Idle time since the last recorded visit.
    pub fn idle_since(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.metadata.last_visited
    }

    /// Display title with fallback to the URL.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_new_tab_defaults() {
        let tab = Tab::blank();
        assert_eq!(tab.url, PLACEHOLDER_URL);
        assert_eq!(tab.title, "New Tab");
        assert_eq!(tab.load_state, LoadState::Unloaded);
        assert_eq!(tab.metadata.visit_count, 0);
        assert!(!tab.active && !tab.pinned && !tab.hibernated);
    }

    #[test]
    fn test_extract_domain_total() {
        assert_eq!(Tab::extract_domain("https://example.com/page"), "example.com");
        assert_eq!(Tab::extract_domain("http://sub.example.com"), "sub.example.com");
        assert_eq!(Tab::extract_domain("about:blank"), "");
        assert_eq!(Tab::extract_domain("not a url"), "");
        assert_eq!(Tab::extract_domain(""), "");
    }

    #[test]
    fn test_navigate_records_history_and_visit() {
        let mut tab = Tab::blank();
        tab.navigate("https://a.com/1");

        // Placeholder page is not recorded
        assert!(!tab.can_go_back());
        assert_eq!(tab.load_state, LoadState::Loaded);
        assert_eq!(tab.metadata.visit_count, 1);
        assert_eq!(
            tab.metadata.favicon_url.as_deref(),
            Some("https://a.com/favicon.ico")
        );

        tab.navigate("https://b.com/2");
        assert!(tab.can_go_back());
        assert_eq!(tab.metadata.visit_count, 2);
    }

    #[test]
    fn test_navigate_preserves_forward_stack() {
        let mut tab = Tab::blank();
        tab.navigate("https://a.com/1");
        tab.navigate("https://b.com/2");
        tab.go_back().unwrap();
        assert!(tab.can_go_forward());

        // Fresh navigation leaves the stale forward stack in place, matching
        // the source engine.
        tab.navigate("https://c.com/3");
        assert!(tab.can_go_forward());
    }

    #[test]
    fn test_back_forward_roundtrip() {
        let mut tab = Tab::blank();
        tab.navigate("https://a.com/1");
        tab.set_title("A");
        tab.navigate("https://b.com/2");
        tab.set_title("B");

        tab.go_back().unwrap();
        assert_eq!(tab.url, "https://a.com/1");
        assert_eq!(tab.title, "A");

        tab.go_forward().unwrap();
        assert_eq!(tab.url, "https://b.com/2");
        assert_eq!(tab.title, "B");

        // Visits: two navigations + back + forward
        assert_eq!(tab.metadata.visit_count, 4);
    }

    #[test]
    fn test_go_back_empty_is_noop_error() {
        let mut tab = Tab::blank();
        assert!(matches!(tab.go_back(), Err(TabError::NoBackHistory)));
        assert!(matches!(tab.go_forward(), Err(TabError::NoForwardHistory)));
        assert_eq!(tab.url, PLACEHOLDER_URL);
    }

    #[test]
    fn test_pinned_tab_refuses_hibernation() {
        let mut tab = Tab::new("https://a.com");
        tab.set_pinned(true);

        assert!(matches!(
            tab.hibernate(true),
            Err(TabError::HibernatePinned(_))
        ));
        assert!(!tab.hibernated);
    }

    #[test]
    fn test_pinning_wakes_hibernated_tab() {
        let mut tab = Tab::new("https://a.com");
        tab.hibernate(true).unwrap();
        assert!(tab.hibernated);

        tab.set_pinned(true);
        assert!(!tab.hibernated);
    }

    #[test]
    fn test_activation_wakes_hibernated_tab() {
        let mut tab = Tab::new("https://a.com");
        tab.hibernate(true).unwrap();

        tab.set_active(true);
        assert!(tab.active);
        assert!(!tab.hibernated);
    }

    #[test]
    fn test_hibernation_does_not_touch_visit_metadata() {
        let mut tab = Tab::new("https://a.com");
        tab.navigate("https://a.com/1");
        let visits = tab.metadata.visit_count;
        let last = tab.metadata.last_visited;

        tab.hibernate(true).unwrap();
        tab.hibernate(false).unwrap();

        assert_eq!(tab.metadata.visit_count, visits);
        assert_eq!(tab.metadata.last_visited, last);
    }

    #[test]
    fn test_refusal_emits_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tab = Tab::new("https://a.com");
        tab.set_pinned(true);

        let sink = Arc::clone(&seen);
        tab.subscribe(move |event| {
            sink.lock().unwrap().push(event.kind);
        });

        let _ = tab.hibernate(true);
        assert_eq!(*seen.lock().unwrap(), vec![TabEventKind::HibernateRefused]);
    }

    #[test]
    fn test_title_and_media_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tab = Tab::new("https://a.com");

        let sink = Arc::clone(&seen);
        let id = tab.subscribe(move |event| {
            sink.lock().unwrap().push(event.kind);
        });

        tab.set_title("Docs");
        tab.set_media_state(MediaState::Playing);
        assert!(tab.unsubscribe(id));
        tab.set_title("Ignored");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![TabEventKind::TitleChanged, TabEventKind::MediaStateChanged]
        );
    }
}
