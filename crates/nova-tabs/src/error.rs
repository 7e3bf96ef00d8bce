//! Tab error types
//!
//! All tab operations are total: these variants signal refusals and no-ops,
//! never unrecoverable conditions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Cannot hibernate pinned tab: {0}")]
    HibernatePinned(String),

    #[error("No back history")]
    NoBackHistory,

    #[error("No forward history")]
    NoForwardHistory,
}
