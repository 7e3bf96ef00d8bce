//! Group error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Tab not found in group: {0}")]
    TabNotFound(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Tab index out of range: {0}")]
    InvalidIndex(usize),

    #[error("Tab error: {0}")]
    Tab(#[from] nova_tabs::TabError),
}
