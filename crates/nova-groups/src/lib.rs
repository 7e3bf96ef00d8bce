//! NOVA Tab Groups
//!
//! A group owns an ordered collection of tabs, keeps a domain secondary
//! index and aggregate metrics consistent across every mutation, applies
//! the idle-based hibernation policy, and supports URL-only snapshots of
//! membership for checkpoint/restore and archival.

mod archive;
mod error;
mod group;
mod index;
mod metrics;
mod policy;
mod snapshot;

pub use archive::{ArchivedTab, TabArchive};
pub use error::GroupError;
pub use group::{AutoGroupingRule, TabGroup, ViewMode};
pub use metrics::GroupMetrics;
pub use policy::should_hibernate;
pub use snapshot::{GroupRecord, Snapshot, SnapshotStore};

pub type Result<T> = std::result::Result<T, GroupError>;
