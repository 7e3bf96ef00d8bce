//! Hibernation policy
//!
//! The one time-driven rule in the engine: evict a tab iff it is not
//! active, not pinned, not already hibernated, and has been idle longer
//! than the threshold. Idempotent (already-hibernated tabs never match)
//! and monotone (the policy only ever hibernates; waking happens through
//! activation or pinning).

use chrono::{DateTime, Duration, Utc};
use nova_tabs::Tab;

/// Decide whether the policy evicts this tab at `now`.
pub fn should_hibernate(tab: &Tab, now: DateTime<Utc>, threshold: Duration) -> bool {
    !tab.active && !tab.pinned && !tab.hibernated && tab.idle_since(now) > threshold
}
