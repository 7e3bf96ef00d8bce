//! Session-state organization engine
//!
//! The central state container. Tabs start life in a nursery of unattached
//! entities; adding one to a group transfers exclusive ownership there, and
//! removing it from a group destroys it. Every group is guarded by its own
//! exclusive lock, held for the full duration of bulk operations (sweeps,
//! snapshot capture/restore), so derived state is never observed partially
//! updated. Cross-group moves take the two group locks one after the other,
//! never nested.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nova_groups::{
    ArchivedTab, AutoGroupingRule, GroupMetrics, GroupRecord, TabArchive, TabGroup, ViewMode,
};
use nova_tabs::{Importance, ListenerId, LoadState, MediaState, Tab, TabEvent};

use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::Result;

/// Cloneable, serializable summary of a tab's current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: String,
    pub url: String,
    pub title: String,
    pub load_state: LoadState,
    pub media_state: MediaState,
    pub importance: Importance,
    pub active: bool,
    pub pinned: bool,
    pub hibernated: bool,
    pub visit_count: u32,
    pub last_visited: DateTime<Utc>,
    pub favicon_url: Option<String>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl TabInfo {
    fn from_tab(tab: &Tab) -> Self {
        Self {
            id: tab.id.clone(),
            url: tab.url.clone(),
            title: tab.title.clone(),
            load_state: tab.load_state,
            media_state: tab.media_state,
            importance: tab.importance,
            active: tab.active,
            pinned: tab.pinned,
            hibernated: tab.hibernated,
            visit_count: tab.metadata.visit_count,
            last_visited: tab.metadata.last_visited,
            favicon_url: tab.metadata.favicon_url.clone(),
            can_go_back: tab.can_go_back(),
            can_go_forward: tab.can_go_forward(),
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    /// Tabs created but not yet placed in a group
    nursery: Arc<RwLock<Vec<Tab>>>,
    /// Group id -> group store, one exclusive lock each
    groups: Arc<RwLock<HashMap<String, Arc<RwLock<TabGroup>>>>>,
    archive: Arc<RwLock<TabArchive>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            nursery: Arc::new(RwLock::new(Vec::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            archive: Arc::new(RwLock::new(TabArchive::new())),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Tab lifecycle ===

    /// Create an unattached tab. `None` means the configured placeholder.
    pub fn create_tab(&self, url: Option<&str>) -> String {
        let tab = Tab::new(url.unwrap_or(&self.config.placeholder_url));
        let id = tab.id.clone();

        tracing::info!(tab_id = %id, url = %tab.url, "Created tab");
        self.nursery.write().push(tab);
        id
    }

    /// Run a closure against a tab wherever it lives (nursery or group).
    /// Group-resident tabs are mutated through the group so the domain
    /// index follows URL changes.
    fn with_tab_mut<R>(&self, tab_id: &str, mutate: impl FnOnce(&mut Tab) -> R) -> Result<R> {
        {
            let mut nursery = self.nursery.write();
            if let Some(tab) = nursery.iter_mut().find(|tab| tab.id == tab_id) {
                return Ok(mutate(tab));
            }
        }

        let groups: Vec<Arc<RwLock<TabGroup>>> = self.groups.read().values().cloned().collect();
        let mut mutate = Some(mutate);
        for group in groups {
            let mut guard = group.write();
            if guard.contains(tab_id) {
                if let Some(mutate) = mutate.take() {
                    return Ok(guard.update_tab(tab_id, mutate)?);
                }
            }
        }

        Err(CoreError::TabNotFound(tab_id.to_string()))
    }

    fn with_tab<R>(&self, tab_id: &str, read: impl FnOnce(&Tab) -> R) -> Result<R> {
        {
            let nursery = self.nursery.read();
            if let Some(tab) = nursery.iter().find(|tab| tab.id == tab_id) {
                return Ok(read(tab));
            }
        }

        let groups: Vec<Arc<RwLock<TabGroup>>> = self.groups.read().values().cloned().collect();
        let mut read = Some(read);
        for group in groups {
            let guard = group.read();
            if let Some(tab) = guard.get(tab_id) {
                if let Some(read) = read.take() {
                    return Ok(read(tab));
                }
            }
        }

        Err(CoreError::TabNotFound(tab_id.to_string()))
    }

    /// Withdraw a tab from wherever it lives, transferring ownership to the
    /// caller.
    fn take_tab(&self, tab_id: &str) -> Result<Tab> {
        {
            let mut nursery = self.nursery.write();
            if let Some(pos) = nursery.iter().position(|tab| tab.id == tab_id) {
                return Ok(nursery.remove(pos));
            }
        }

        let groups: Vec<Arc<RwLock<TabGroup>>> = self.groups.read().values().cloned().collect();
        for group in groups {
            let mut guard = group.write();
            if guard.contains(tab_id) {
                return Ok(guard.remove_tab(tab_id)?);
            }
        }

        Err(CoreError::TabNotFound(tab_id.to_string()))
    }

    pub fn navigate(&self, tab_id: &str, url: &str) -> Result<()> {
        let url = url.to_string();
        self.with_tab_mut(tab_id, move |tab| tab.navigate(url))
    }

    pub fn go_back(&self, tab_id: &str) -> Result<()> {
        self.with_tab_mut(tab_id, |tab| tab.go_back())?
            .map_err(CoreError::from)
    }

    pub fn go_forward(&self, tab_id: &str) -> Result<()> {
        self.with_tab_mut(tab_id, |tab| tab.go_forward())?
            .map_err(CoreError::from)
    }

    pub fn reload(&self, tab_id: &str) -> Result<()> {
        self.with_tab_mut(tab_id, |tab| tab.reload())
    }

    pub fn set_title(&self, tab_id: &str, title: &str) -> Result<()> {
        let title = title.to_string();
        self.with_tab_mut(tab_id, move |tab| tab.set_title(title))
    }

    pub fn set_active(&self, tab_id: &str, active: bool) -> Result<()> {
        self.with_tab_mut(tab_id, move |tab| tab.set_active(active))
    }

    pub fn set_pinned(&self, tab_id: &str, pinned: bool) -> Result<()> {
        self.with_tab_mut(tab_id, move |tab| tab.set_pinned(pinned))
    }

    /// Hibernate or wake a tab. Hibernating a pinned tab is a reported
    /// refusal, not a state change.
    pub fn hibernate(&self, tab_id: &str, hibernate: bool) -> Result<()> {
        self.with_tab_mut(tab_id, move |tab| tab.hibernate(hibernate))?
            .map_err(CoreError::from)
    }

    pub fn set_media_state(&self, tab_id: &str, state: MediaState) -> Result<()> {
        self.with_tab_mut(tab_id, move |tab| tab.set_media_state(state))
    }

    pub fn set_importance(&self, tab_id: &str, importance: Importance) -> Result<()> {
        self.with_tab_mut(tab_id, move |tab| tab.set_importance(importance))
    }

    pub fn tab_info(&self, tab_id: &str) -> Result<TabInfo> {
        self.with_tab(tab_id, TabInfo::from_tab)
    }

    /// Attach an event listener to a tab.
    pub fn subscribe<F>(&self, tab_id: &str, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&TabEvent) + Send + 'static,
    {
        self.with_tab_mut(tab_id, move |tab| tab.subscribe(listener))
    }

    pub fn unsubscribe(&self, tab_id: &str, listener_id: ListenerId) -> Result<bool> {
        self.with_tab_mut(tab_id, move |tab| tab.unsubscribe(listener_id))
    }

    // === Groups ===

    pub fn create_group(&self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let group = TabGroup::new(name);

        tracing::info!(group_id = %id, name, "Created group");
        self.groups
            .write()
            .insert(id.clone(), Arc::new(RwLock::new(group)));
        id
    }

    fn group(&self, group_id: &str) -> Result<Arc<RwLock<TabGroup>>> {
        self.groups
            .read()
            .get(group_id)
            .cloned()
            .ok_or_else(|| CoreError::GroupNotFound(group_id.to_string()))
    }

    /// (group id, group name) pairs for every group.
    pub fn list_groups(&self) -> Vec<(String, String)> {
        self.groups
            .read()
            .iter()
            .map(|(id, group)| (id.clone(), group.read().name.clone()))
            .collect()
    }

    /// Move a tab into a group, withdrawing it from the nursery or from its
    /// current group first (ownership is exclusive).
    pub fn add_tab_to_group(&self, group_id: &str, tab_id: &str) -> Result<()> {
        let group = self.group(group_id)?;
        let tab = self.take_tab(tab_id)?;
        group.write().add_tab(tab);
        Ok(())
    }

    /// Remove a tab from a group and destroy it, returning its final state.
    pub fn remove_tab(&self, group_id: &str, tab_id: &str) -> Result<TabInfo> {
        let group = self.group(group_id)?;
        let tab = group.write().remove_tab(tab_id)?;
        Ok(TabInfo::from_tab(&tab))
    }

    /// Move the member at `index` of one group into another. Source and
    /// target locks are taken one after the other.
    pub fn move_tab(&self, group_id: &str, index: usize, target_group_id: &str) -> Result<()> {
        let source = self.group(group_id)?;

        if group_id == target_group_id {
            // Still a no-op, but an out-of-range index is reported.
            if index >= source.read().len() {
                return Err(nova_groups::GroupError::InvalidIndex(index).into());
            }
            return Ok(());
        }

        let target = self.group(target_group_id)?;

        let tab = {
            let mut guard = source.write();
            let tab_id = guard
                .tabs()
                .get(index)
                .map(|tab| tab.id.clone())
                .ok_or(nova_groups::GroupError::InvalidIndex(index))?;
            guard.remove_tab(&tab_id)?
        };

        target.write().add_tab(tab);
        Ok(())
    }

    /// Move every member of one group into another, preserving order.
    pub fn move_all_tabs(&self, group_id: &str, target_group_id: &str) -> Result<()> {
        if group_id == target_group_id {
            return Ok(());
        }

        let source = self.group(group_id)?;
        let target = self.group(target_group_id)?;

        let tabs = {
            let mut guard = source.write();
            let ids: Vec<String> = guard.tabs().iter().map(|tab| tab.id.clone()).collect();
            let mut moved = Vec::with_capacity(ids.len());
            for id in ids {
                moved.push(guard.remove_tab(&id)?);
            }
            moved
        };

        let mut guard = target.write();
        for tab in tabs {
            guard.add_tab(tab);
        }
        Ok(())
    }

    // === Lookup & organization ===

    pub fn find_by_domain(&self, group_id: &str, domain: &str) -> Result<Vec<TabInfo>> {
        let group = self.group(group_id)?;
        let guard = group.read();
        Ok(guard
            .find_tabs_by_domain(domain)
            .into_iter()
            .map(TabInfo::from_tab)
            .collect())
    }

    pub fn search(&self, group_id: &str, pattern: &str) -> Result<Vec<TabInfo>> {
        let group = self.group(group_id)?;
        let guard = group.read();
        Ok(guard
            .search_tabs(pattern)
            .into_iter()
            .map(TabInfo::from_tab)
            .collect())
    }

    pub fn group_tabs(&self, group_id: &str) -> Result<Vec<TabInfo>> {
        let group = self.group(group_id)?;
        let guard = group.read();
        Ok(guard.tabs().iter().map(TabInfo::from_tab).collect())
    }

    pub fn sort_by_title(&self, group_id: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().sort_tabs_by_title())
    }

    pub fn sort_by_last_visited(&self, group_id: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().sort_tabs_by_last_visited())
    }

    pub fn set_auto_grouping(
        &self,
        group_id: &str,
        enabled: bool,
        rule: AutoGroupingRule,
    ) -> Result<()> {
        Ok(self.group(group_id)?.write().set_auto_grouping(enabled, rule))
    }

    pub fn reorganize(&self, group_id: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().reorganize_tabs())
    }

    pub fn set_view_mode(&self, group_id: &str, mode: ViewMode) -> Result<()> {
        Ok(self.group(group_id)?.write().set_view_mode(mode))
    }

    pub fn toggle_collapse(&self, group_id: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().toggle_collapse())
    }

    pub fn rename_group(&self, group_id: &str, name: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().set_name(name))
    }

    pub fn set_group_color(&self, group_id: &str, color: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().set_color(color))
    }

    pub fn set_group_icon(&self, group_id: &str, icon: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().set_icon(icon))
    }

    // === Hibernation sweeps ===

    /// Trigger a hibernation sweep over one group. `threshold_minutes`
    /// falls back to the configured default. Returns how many tabs were
    /// hibernated.
    pub fn sweep(&self, group_id: &str, threshold_minutes: Option<i64>) -> Result<usize> {
        let threshold =
            Duration::minutes(threshold_minutes.unwrap_or(self.config.sweep_threshold_minutes));
        Ok(self.group(group_id)?.write().hibernate_inactive_tabs(threshold))
    }

    /// Sweep every group, typically driven by an external scheduler tick.
    pub fn sweep_all(&self, threshold_minutes: Option<i64>) -> usize {
        let threshold =
            Duration::minutes(threshold_minutes.unwrap_or(self.config.sweep_threshold_minutes));
        let groups: Vec<Arc<RwLock<TabGroup>>> = self.groups.read().values().cloned().collect();

        groups
            .into_iter()
            .map(|group| group.write().hibernate_inactive_tabs(threshold))
            .sum()
    }

    // === Snapshots & archival ===

    pub fn snapshot(&self, group_id: &str) -> Result<String> {
        Ok(self.group(group_id)?.write().create_snapshot())
    }

    pub fn restore_snapshot(&self, group_id: &str, snapshot_id: &str) -> Result<()> {
        Ok(self.group(group_id)?.write().restore_snapshot(snapshot_id)?)
    }

    pub fn list_snapshots(&self, group_id: &str) -> Result<Vec<String>> {
        Ok(self.group(group_id)?.read().list_snapshots())
    }

    /// Snapshot a group and optionally clear its membership.
    pub fn archive_group(&self, group_id: &str, keep_group: bool) -> Result<String> {
        Ok(self.group(group_id)?.write().archive_tabs(keep_group))
    }

    /// Copy a tab's identity into the archive; the live tab is untouched.
    pub fn archive_tab(&self, tab_id: &str) -> Result<()> {
        let archive = Arc::clone(&self.archive);
        self.with_tab(tab_id, move |tab| archive.write().archive_tab(tab))
    }

    pub fn search_archive(&self, query: &str) -> Vec<ArchivedTab> {
        self.archive
            .read()
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Rebuild a tab from the archive entry at `index`; the fresh tab is
    /// placed in the nursery and the entry is consumed.
    pub fn restore_archived(&self, index: usize) -> Result<String> {
        let tab = self
            .archive
            .write()
            .restore(index)
            .ok_or(CoreError::ArchiveIndexOutOfRange(index))?;

        let id = tab.id.clone();
        self.nursery.write().push(tab);
        Ok(id)
    }

    /// Drop archive entries older than `days`, defaulting to the configured
    /// retention.
    pub fn clear_archives_older_than(&self, days: Option<i64>) -> usize {
        self.archive
            .write()
            .clear_older_than(days.unwrap_or(self.config.archive_retention_days))
    }

    // === Metrics & insights ===

    pub fn group_metrics(&self, group_id: &str) -> Result<GroupMetrics> {
        Ok(self.group(group_id)?.read().metrics().clone())
    }

    pub fn record_focus_time(&self, group_id: &str, seconds: i64) -> Result<()> {
        Ok(self
            .group(group_id)?
            .write()
            .record_focus_time(Duration::seconds(seconds)))
    }

    pub fn group_insights(&self, group_id: &str) -> Result<String> {
        Ok(self.group(group_id)?.read().generate_insights())
    }

    // === Durable shape ===

    pub fn export_group(&self, group_id: &str) -> Result<GroupRecord> {
        Ok(self.group(group_id)?.read().to_record())
    }

    /// Build a new group from its durable shape; returns the new group id.
    pub fn import_group(&self, record: GroupRecord) -> String {
        let id = Uuid::new_v4().to_string();
        let group = TabGroup::from_record(record);

        tracing::info!(group_id = %id, name = %group.name, "Imported group");
        self.groups
            .write()
            .insert(id.clone(), Arc::new(RwLock::new(group)));
        id
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Clone for Engine {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            nursery: Arc::clone(&self.nursery),
            groups: Arc::clone(&self.groups),
            archive: Arc::clone(&self.archive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_tabs::TabEventKind;
    use std::sync::{Arc as StdArc, Mutex};

    #[test]
    fn test_create_tab_in_nursery() {
        let engine = Engine::default();
        let id = engine.create_tab(None);

        let info = engine.tab_info(&id).unwrap();
        assert_eq!(info.url, "about:blank");
        assert_eq!(info.load_state, LoadState::Unloaded);
    }

    #[test]
    fn test_unknown_handles_error() {
        let engine = Engine::default();
        assert!(matches!(
            engine.tab_info("missing"),
            Err(CoreError::TabNotFound(_))
        ));
        assert!(matches!(
            engine.snapshot("missing"),
            Err(CoreError::GroupNotFound(_))
        ));
    }

    #[test]
    fn test_add_tab_moves_from_nursery() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");
        let tab_id = engine.create_tab(Some("https://a.com"));

        engine.add_tab_to_group(&group_id, &tab_id).unwrap();

        assert_eq!(engine.group_metrics(&group_id).unwrap().total_tabs, 1);
        // Still addressable through the group.
        assert_eq!(engine.tab_info(&tab_id).unwrap().url, "https://a.com");
    }

    #[test]
    fn test_exclusive_ownership_across_groups() {
        let engine = Engine::default();
        let work = engine.create_group("Work");
        let play = engine.create_group("Play");
        let tab_id = engine.create_tab(Some("https://a.com"));

        engine.add_tab_to_group(&work, &tab_id).unwrap();
        engine.add_tab_to_group(&play, &tab_id).unwrap();

        assert_eq!(engine.group_metrics(&work).unwrap().total_tabs, 0);
        assert_eq!(engine.group_metrics(&play).unwrap().total_tabs, 1);
        // The index moved with it.
        assert!(engine.find_by_domain(&work, "a.com").unwrap().is_empty());
        assert_eq!(engine.find_by_domain(&play, "a.com").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_tab_destroys() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");
        let tab_id = engine.create_tab(Some("https://a.com"));
        engine.add_tab_to_group(&group_id, &tab_id).unwrap();

        let info = engine.remove_tab(&group_id, &tab_id).unwrap();
        assert_eq!(info.url, "https://a.com");
        assert!(matches!(
            engine.tab_info(&tab_id),
            Err(CoreError::TabNotFound(_))
        ));
    }

    #[test]
    fn test_navigate_in_group_updates_index() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");
        let tab_id = engine.create_tab(Some("https://a.com/1"));
        engine.add_tab_to_group(&group_id, &tab_id).unwrap();

        engine.navigate(&tab_id, "https://b.com/2").unwrap();

        assert!(engine.find_by_domain(&group_id, "a.com").unwrap().is_empty());
        assert_eq!(engine.find_by_domain(&group_id, "b.com").unwrap().len(), 1);
    }

    #[test]
    fn test_back_forward_through_engine() {
        let engine = Engine::default();
        let tab_id = engine.create_tab(None);

        engine.navigate(&tab_id, "https://a.com/1").unwrap();
        engine.navigate(&tab_id, "https://b.com/2").unwrap();
        engine.go_back(&tab_id).unwrap();

        let info = engine.tab_info(&tab_id).unwrap();
        assert_eq!(info.url, "https://a.com/1");
        assert!(info.can_go_forward);

        assert!(matches!(
            engine.go_back(&tab_id),
            Err(CoreError::Tab(nova_tabs::TabError::NoBackHistory))
        ));
    }

    #[test]
    fn test_hibernate_pinned_refused_through_engine() {
        let engine = Engine::default();
        let tab_id = engine.create_tab(Some("https://a.com"));
        engine.set_pinned(&tab_id, true).unwrap();

        assert!(engine.hibernate(&tab_id, true).is_err());
        assert!(!engine.tab_info(&tab_id).unwrap().hibernated);
    }

    #[test]
    fn test_sweep_uses_config_default() {
        let engine = Engine::new(EngineConfig {
            sweep_threshold_minutes: 30,
            ..EngineConfig::default()
        });
        let group_id = engine.create_group("Work");

        let idle = engine.create_tab(Some("https://b.com/2"));
        engine.add_tab_to_group(&group_id, &idle).unwrap();
        let fresh = engine.create_tab(Some("https://a.com/1"));
        engine.add_tab_to_group(&group_id, &fresh).unwrap();

        // Age the idle tab through the group API.
        {
            let group = engine.group(&group_id).unwrap();
            group
                .write()
                .update_tab(&idle, |tab| {
                    tab.metadata.last_visited = Utc::now() - Duration::minutes(45);
                })
                .unwrap();
        }

        assert_eq!(engine.sweep(&group_id, None).unwrap(), 1);
        assert!(engine.tab_info(&idle).unwrap().hibernated);
        assert!(!engine.tab_info(&fresh).unwrap().hibernated);

        // Idempotent with no intervening activity.
        assert_eq!(engine.sweep(&group_id, None).unwrap(), 0);
    }

    #[test]
    fn test_snapshot_restore_through_engine() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");
        for url in ["https://a.com/1", "https://b.com/2", "https://c.com/3"] {
            let tab_id = engine.create_tab(Some(url));
            engine.add_tab_to_group(&group_id, &tab_id).unwrap();
        }

        let snapshot_id = engine.snapshot(&group_id).unwrap();
        assert_eq!(engine.list_snapshots(&group_id).unwrap().len(), 1);

        // Drop all members, then restore.
        let tabs = engine.group_tabs(&group_id).unwrap();
        for info in &tabs {
            engine.remove_tab(&group_id, &info.id).unwrap();
        }

        engine.restore_snapshot(&group_id, &snapshot_id).unwrap();
        let restored = engine.group_tabs(&group_id).unwrap();
        let urls: Vec<&str> = restored.iter().map(|info| info.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com/1", "https://b.com/2", "https://c.com/3"]);
        assert_eq!(engine.group_metrics(&group_id).unwrap().active_tabs, 0);
    }

    #[test]
    fn test_tab_archive_flow() {
        let engine = Engine::default();
        let tab_id = engine.create_tab(Some("https://docs.rs/serde"));
        engine.set_title(&tab_id, "Serde Docs").unwrap();

        engine.archive_tab(&tab_id).unwrap();
        assert_eq!(engine.search_archive("serde").len(), 1);

        let restored_id = engine.restore_archived(0).unwrap();
        assert_ne!(restored_id, tab_id);
        let info = engine.tab_info(&restored_id).unwrap();
        assert_eq!(info.url, "https://docs.rs/serde");
        assert_eq!(info.title, "Serde Docs");
        assert!(engine.search_archive("serde").is_empty());

        assert!(matches!(
            engine.restore_archived(5),
            Err(CoreError::ArchiveIndexOutOfRange(5))
        ));

        // Zero-day retention drops everything archived before this instant.
        engine.archive_tab(&restored_id).unwrap();
        assert_eq!(engine.clear_archives_older_than(Some(0)), 1);
        assert!(engine.search_archive("serde").is_empty());
    }

    #[test]
    fn test_event_subscription_through_engine() {
        let engine = Engine::default();
        let tab_id = engine.create_tab(Some("https://a.com"));

        let seen = StdArc::new(Mutex::new(Vec::new()));
        let sink = StdArc::clone(&seen);
        let listener_id = engine
            .subscribe(&tab_id, move |event| {
                sink.lock().unwrap().push(event.kind);
            })
            .unwrap();

        engine.set_title(&tab_id, "Docs").unwrap();
        engine.set_media_state(&tab_id, MediaState::Muted).unwrap();
        assert!(engine.unsubscribe(&tab_id, listener_id).unwrap());
        engine.set_title(&tab_id, "Ignored").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![TabEventKind::TitleChanged, TabEventKind::MediaStateChanged]
        );
    }

    #[test]
    fn test_export_import_group() {
        let engine = Engine::default();
        let group_id = engine.create_group("Research");
        engine.set_group_color(&group_id, "#112233").unwrap();
        for url in ["https://a.com/1", "https://b.com/2"] {
            let tab_id = engine.create_tab(Some(url));
            engine.add_tab_to_group(&group_id, &tab_id).unwrap();
        }

        let record = engine.export_group(&group_id).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: GroupRecord = serde_json::from_str(&json).unwrap();

        let imported_id = engine.import_group(parsed);
        let tabs = engine.group_tabs(&imported_id).unwrap();
        let urls: Vec<&str> = tabs.iter().map(|info| info.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com/1", "https://b.com/2"]);
        assert_eq!(
            engine.find_by_domain(&imported_id, "b.com").unwrap().len(),
            1
        );
    }

    #[test]
    fn test_move_tab_between_groups() {
        let engine = Engine::default();
        let work = engine.create_group("Work");
        let play = engine.create_group("Play");
        for url in ["https://a.com/1", "https://b.com/2"] {
            let tab_id = engine.create_tab(Some(url));
            engine.add_tab_to_group(&work, &tab_id).unwrap();
        }

        engine.move_tab(&work, 0, &play).unwrap();
        assert_eq!(engine.group_metrics(&work).unwrap().total_tabs, 1);
        assert_eq!(engine.find_by_domain(&play, "a.com").unwrap().len(), 1);

        engine.move_all_tabs(&work, &play).unwrap();
        assert_eq!(engine.group_metrics(&work).unwrap().total_tabs, 0);
        assert_eq!(engine.group_metrics(&play).unwrap().total_tabs, 2);

        assert!(matches!(
            engine.move_tab(&work, 3, &play),
            Err(CoreError::Group(nova_groups::GroupError::InvalidIndex(3)))
        ));
    }

    #[test]
    fn test_move_tab_same_group_validates_index() {
        let engine = Engine::default();
        let work = engine.create_group("Work");
        let tab_id = engine.create_tab(Some("https://a.com"));
        engine.add_tab_to_group(&work, &tab_id).unwrap();

        // In-range same-group move is a no-op.
        engine.move_tab(&work, 0, &work).unwrap();
        assert_eq!(engine.group_metrics(&work).unwrap().total_tabs, 1);

        // Out-of-range index is reported even when nothing would move.
        assert!(matches!(
            engine.move_tab(&work, 1, &work),
            Err(CoreError::Group(nova_groups::GroupError::InvalidIndex(1)))
        ));
    }

    #[test]
    fn test_group_management_surface() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");

        engine.rename_group(&group_id, "Deep Work").unwrap();
        engine.set_view_mode(&group_id, ViewMode::Grid).unwrap();
        engine.toggle_collapse(&group_id).unwrap();
        engine
            .set_auto_grouping(&group_id, true, AutoGroupingRule::ByTime)
            .unwrap();
        engine.record_focus_time(&group_id, 120).unwrap();

        let groups = engine.list_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1, "Deep Work");

        let insights = engine.group_insights(&group_id).unwrap();
        assert!(insights.contains("Deep Work"));
        assert!(insights.contains("120 seconds"));
    }

    #[test]
    fn test_search_through_engine() {
        let engine = Engine::default();
        let group_id = engine.create_group("Work");
        let first = engine.create_tab(Some("https://b.com/guide"));
        engine.add_tab_to_group(&group_id, &first).unwrap();
        let second = engine.create_tab(Some("https://a.com"));
        engine.set_title(&second, "The GUIDE").unwrap();
        engine.add_tab_to_group(&group_id, &second).unwrap();

        let found = engine.search(&group_id, "guide").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].url, "https://b.com/guide");
    }
}
