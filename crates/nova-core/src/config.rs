//! Engine configuration

use serde::{Deserialize, Serialize};

use nova_tabs::PLACEHOLDER_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// URL assigned to tabs created without one
    pub placeholder_url: String,
    /// Default idle threshold for hibernation sweeps, in minutes
    pub sweep_threshold_minutes: i64,
    /// Archived tabs older than this are dropped by cleanup, in days
    pub archive_retention_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_url: PLACEHOLDER_URL.to_string(),
            sweep_threshold_minutes: 30,
            archive_retention_days: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.placeholder_url, "about:blank");
        assert_eq!(config.sweep_threshold_minutes, 30);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig {
            placeholder_url: "about:home".into(),
            sweep_threshold_minutes: 15,
            archive_retention_days: 7,
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.sweep_threshold_minutes, 15);
        assert_eq!(restored.placeholder_url, "about:home");
    }
}
