//! NOVA Core
//!
//! Engine facade for the session-state organization engine: a handle-based
//! surface over tabs, groups, hibernation sweeps, snapshots, and the tab
//! archive, with one exclusive lock per group.

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{Engine, TabInfo};
pub use error::CoreError;

// Re-export engine building blocks
pub use nova_groups::{
    ArchivedTab, AutoGroupingRule, GroupError, GroupMetrics, GroupRecord, TabArchive, TabGroup,
    ViewMode,
};
pub use nova_tabs::{
    Importance, ListenerId, LoadState, MediaState, Tab, TabError, TabEvent, TabEventKind,
    PLACEHOLDER_URL,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
