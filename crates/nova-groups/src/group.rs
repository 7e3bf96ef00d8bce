//! Tab group store
//!
//! Owns an ordered collection of tabs and maintains two pieces of derived
//! state as a side effect of every mutation: the domain secondary index
//! and the aggregate metrics. Neither is ever observable in a partially
//! updated condition; callers that need that guarantee across threads wrap
//! the group in one exclusive lock (see nova-core).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use nova_tabs::{Tab, TabEvent};

use crate::error::GroupError;
use crate::index::DomainIndex;
use crate::metrics::GroupMetrics;
use crate::policy::should_hibernate;
use crate::snapshot::{GroupRecord, Snapshot, SnapshotStore};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    #[default]
    List,
    Carousel,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoGroupingRule {
    #[default]
    ByDomain,
    ByTopic,
    ByTime,
    ByProject,
    ByInteractionPattern,
    Custom,
}

pub struct TabGroup {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub view_mode: ViewMode,
    pub collapsed: bool,
    pub auto_grouping_enabled: bool,
    pub auto_grouping_rule: AutoGroupingRule,
    tabs: Vec<Tab>,
    domain_index: DomainIndex,
    metrics: GroupMetrics,
    snapshots: SnapshotStore,
}

impl TabGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: "#5F9EA0".to_string(),
            icon: String::new(),
            view_mode: ViewMode::default(),
            collapsed: false,
            auto_grouping_enabled: false,
            auto_grouping_rule: AutoGroupingRule::default(),
            tabs: Vec::new(),
            domain_index: DomainIndex::new(),
            metrics: GroupMetrics::new(),
            snapshots: SnapshotStore::new(),
        }
    }

    fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == tab_id)
    }

    /// Append a tab to the membership, indexing its domain and refreshing
    /// metrics. The group takes exclusive ownership.
    pub fn add_tab(&mut self, tab: Tab) {
        let domain = Tab::extract_domain(&tab.url);
        self.domain_index.insert(&domain, &tab.id);

        tracing::debug!(group = %self.name, tab_id = %tab.id, url = %tab.url, "Added tab to group");

        self.tabs.push(tab);
        self.metrics.touch();
        self.update_metrics();
    }

    /// Remove a tab by id, unindexing it and refreshing metrics. The tab is
    /// handed back to the caller; dropping it destroys it.
    pub fn remove_tab(&mut self, tab_id: &str) -> Result<Tab> {
        let pos = self
            .position(tab_id)
            .ok_or_else(|| GroupError::TabNotFound(tab_id.to_string()))?;

        let tab = self.tabs.remove(pos);
        let domain = Tab::extract_domain(&tab.url);
        self.domain_index.remove(&domain, &tab.id);
        self.update_metrics();

        tracing::debug!(group = %self.name, tab_id = %tab.id, "Removed tab from group");
        Ok(tab)
    }

    /// Mutate a member tab through the group, so the domain index follows
    /// URL changes and metrics are refreshed afterwards. Events the tab
    /// emits during the mutation are funneled into `handle_tab_event`.
    pub fn update_tab<R>(&mut self, tab_id: &str, mutate: impl FnOnce(&mut Tab) -> R) -> Result<R> {
        let pos = self
            .position(tab_id)
            .ok_or_else(|| GroupError::TabNotFound(tab_id.to_string()))?;

        let old_domain = Tab::extract_domain(&self.tabs[pos].url);

        let emitted: Arc<Mutex<Vec<TabEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&emitted);
        let listener_id = self.tabs[pos].subscribe(move |event| {
            sink.lock().push(event.clone());
        });

        let result = mutate(&mut self.tabs[pos]);

        self.tabs[pos].unsubscribe(listener_id);
        let new_domain = Tab::extract_domain(&self.tabs[pos].url);
        self.domain_index.reindex(&old_domain, &new_domain, tab_id);

        for event in emitted.lock().drain(..) {
            self.handle_tab_event(&event);
        }
        self.update_metrics();
        Ok(result)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == tab_id)
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.position(tab_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Member tabs on a domain, via the secondary index. O(1) average
    /// lookup; empty for unknown domains.
    pub fn find_tabs_by_domain(&self, domain: &str) -> Vec<&Tab> {
        self.domain_index
            .get(domain)
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Case-insensitive substring match over title and URL, in membership
    /// order.
    pub fn search_tabs(&self, pattern: &str) -> Vec<&Tab> {
        let needle = pattern.to_lowercase();
        self.tabs
            .iter()
            .filter(|tab| {
                tab.title.to_lowercase().contains(&needle)
                    || tab.url.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// In-place stable reorder by title. The domain index is keyed by
    /// domain, so ordering does not affect it.
    pub fn sort_tabs_by_title(&mut self) {
        self.tabs.sort_by(|a, b| a.title.cmp(&b.title));
    }

    /// In-place stable reorder, most recently visited first.
    pub fn sort_tabs_by_last_visited(&mut self) {
        self.tabs
            .sort_by(|a, b| b.metadata.last_visited.cmp(&a.metadata.last_visited));
    }

    pub fn set_auto_grouping(&mut self, enabled: bool, rule: AutoGroupingRule) {
        self.auto_grouping_enabled = enabled;
        self.auto_grouping_rule = rule;
        tracing::debug!(group = %self.name, enabled, ?rule, "Auto-grouping configured");

        if enabled {
            self.reorganize_tabs();
        }
    }

    /// Reorganize membership according to the configured rule. Only ByTime
    /// has concrete behavior; the other rules would need collaborators
    /// (topic clustering, project metadata) outside this engine and log
    /// intent only.
    pub fn reorganize_tabs(&mut self) {
        if !self.auto_grouping_enabled {
            return;
        }

        match self.auto_grouping_rule {
            AutoGroupingRule::ByDomain => {
                // Domain lookup is already served by the secondary index.
                tracing::debug!(group = %self.name, "Reorganize by domain: index already current");
            }
            AutoGroupingRule::ByTime => {
                self.sort_tabs_by_last_visited();
            }
            rule => {
                tracing::debug!(group = %self.name, ?rule, "Reorganize rule has no engine-side behavior");
            }
        }
    }

    /// Apply the hibernation policy to every member. Returns how many tabs
    /// were hibernated by this sweep.
    pub fn hibernate_inactive_tabs(&mut self, threshold: Duration) -> usize {
        self.sweep_at(Utc::now(), threshold)
    }

    /// Policy sweep against an explicit clock, for deterministic callers.
    pub fn sweep_at(&mut self, now: DateTime<Utc>, threshold: Duration) -> usize {
        let mut count = 0;
        for tab in self.tabs.iter_mut() {
            if should_hibernate(tab, now, threshold) && tab.hibernate(true).is_ok() {
                count += 1;
            }
        }

        self.update_metrics();
        if count > 0 {
            tracing::info!(group = %self.name, count, "Hibernated inactive tabs");
        }
        count
    }

    /// Capture current membership URLs under a fresh snapshot id.
    pub fn create_snapshot(&mut self) -> String {
        let urls: Vec<String> = self.tabs.iter().map(|tab| tab.url.clone()).collect();
        let id = self.snapshots.capture(urls);

        tracing::info!(group = %self.name, snapshot_id = %id, tabs = self.tabs.len(), "Created snapshot");
        id
    }

    /// Replace current membership with fresh tabs built from a snapshot's
    /// URLs, in captured order. Discarded members are destroyed; restored
    /// tabs carry no prior state.
    pub fn restore_snapshot(&mut self, snapshot_id: &str) -> Result<()> {
        let urls = self
            .snapshots
            .get(snapshot_id)
            .map(|snapshot| snapshot.urls.clone())
            .ok_or_else(|| GroupError::SnapshotNotFound(snapshot_id.to_string()))?;

        self.tabs.clear();
        self.domain_index.clear();

        for url in urls {
            self.add_tab(Tab::new(url));
        }
        // An empty capture skips the loop entirely; metrics must still
        // reflect the cleared membership.
        self.update_metrics();

        tracing::info!(group = %self.name, snapshot_id = %snapshot_id, "Restored snapshot");
        Ok(())
    }

    pub fn list_snapshots(&self) -> Vec<String> {
        self.snapshots.list()
    }

    pub fn snapshot(&self, snapshot_id: &str) -> Option<&Snapshot> {
        self.snapshots.get(snapshot_id)
    }

    /// Move the member at `index` into another group, which re-derives its
    /// domain-index entry there.
    pub fn move_tab(&mut self, index: usize, target: &mut TabGroup) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(GroupError::InvalidIndex(index));
        }

        let tab_id = self.tabs[index].id.clone();
        let tab = self.remove_tab(&tab_id)?;

        tracing::debug!(from = %self.name, to = %target.name, tab_id = %tab.id, "Moved tab");
        target.add_tab(tab);
        Ok(())
    }

    /// Move every member into another group, preserving order.
    pub fn move_all_tabs(&mut self, target: &mut TabGroup) {
        for tab in self.tabs.drain(..) {
            target.add_tab(tab);
        }
        self.domain_index.clear();
        self.update_metrics();

        tracing::debug!(from = %self.name, to = %target.name, "Moved all tabs");
    }

    /// Snapshot first so archival is always recoverable, then optionally
    /// clear membership. Returns the snapshot id.
    pub fn archive_tabs(&mut self, keep_group: bool) -> String {
        let snapshot_id = self.create_snapshot();

        if !keep_group {
            self.tabs.clear();
            self.domain_index.clear();
            self.update_metrics();
        }

        tracing::info!(group = %self.name, snapshot_id = %snapshot_id, keep_group, "Archived tabs");
        snapshot_id
    }

    /// Recompute the derived counters by full scan. Called after every
    /// structural mutation; never left stale across a public boundary.
    fn update_metrics(&mut self) {
        self.metrics.recompute(&self.tabs);
    }

    /// Tab events raised during group-mediated mutations land here: the
    /// event counts as group access and metrics are refreshed. Event kinds
    /// are not differentiated beyond that yet.
    pub fn handle_tab_event(&mut self, event: &TabEvent) {
        tracing::debug!(group = %self.name, tab_id = %event.tab_id, kind = ?event.kind, "Tab event");
        self.metrics.touch();
        self.update_metrics();
    }

    pub fn metrics(&self) -> &GroupMetrics {
        &self.metrics
    }

    pub fn record_focus_time(&mut self, duration: Duration) {
        self.metrics.record_focus_time(duration);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = icon.into();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn toggle_collapse(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Naive focus analysis: the most frequent member domain.
    pub fn suggest_group_focus(&self) -> String {
        if self.tabs.is_empty() {
            return "no specific topic".to_string();
        }

        let top = self
            .domain_index
            .domains()
            .max_by_key(|(_, count)| *count)
            .map(|(domain, _)| domain.to_string());

        match top {
            Some(domain) => format!("{} content", domain),
            None => "productivity tools".to_string(),
        }
    }

    pub fn generate_insights(&self) -> String {
        format!(
            "Group '{}' contains {} tabs primarily focused on {}\nActive tabs: {}\nHibernated tabs: {}\nTotal focus time: {} seconds",
            self.name,
            self.tabs.len(),
            self.suggest_group_focus(),
            self.metrics.active_tabs,
            self.metrics.hibernated_tabs,
            self.metrics.total_focus_time.num_seconds(),
        )
    }

    /// The durable shape of this group: identity-free URL membership plus
    /// the snapshot table.
    pub fn to_record(&self) -> GroupRecord {
        GroupRecord {
            name: self.name.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
            urls: self.tabs.iter().map(|tab| tab.url.clone()).collect(),
            snapshots: self.snapshots.clone(),
        }
    }

    /// Rebuild a group from its durable shape, constructing fresh tabs for
    /// every recorded URL.
    pub fn from_record(record: GroupRecord) -> Self {
        let mut group = TabGroup::new(record.name);
        group.color = record.color;
        group.icon = record.icon;
        group.snapshots = record.snapshots;

        for url in record.urls {
            group.add_tab(Tab::new(url));
        }
        group
    }
}
