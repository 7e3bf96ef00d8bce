//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Archived tab index out of range: {0}")]
    ArchiveIndexOutOfRange(usize),

    #[error("Tab error: {0}")]
    Tab(#[from] nova_tabs::TabError),

    #[error("Group error: {0}")]
    Group(#[from] nova_groups::GroupError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
