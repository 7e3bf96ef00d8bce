//! Snapshots and the persistable group shape
//!
//! A snapshot is an immutable, URL-only capture of a group's membership
//! order. It never holds live tab references, so restoring always
//! reconstructs fresh tab entities: URL order and count survive a round
//! trip, object identity and per-tab state do not. Snapshots are
//! append-only and may be restored any number of times.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Member URLs in membership order at capture time.
    pub urls: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SnapshotStore {
    snapshots: HashMap<String, Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a URL list under a fresh identifier. Uuid ids cannot collide
    /// with an existing capture, so nothing is ever silently overwritten.
    pub fn capture(&mut self, urls: Vec<String>) -> String {
        let snapshot = Snapshot {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            urls,
        };
        let id = snapshot.id.clone();
        self.snapshots.insert(id.clone(), snapshot);
        id
    }

    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.get(id)
    }

    pub fn list(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Durable shape of a group: name/color/icon, membership as an ordered URL
/// list, and the snapshot table. Independent of in-memory object identity,
/// matching snapshot semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub urls: Vec<String>,
    pub snapshots: SnapshotStore,
}
