use std::{fs, path::Path, path::PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::error::ConfigError;

// Engine configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backing file, fully rewritten after every mutation.
    pub store_path: PathBuf,
    /// Bookings further away than this are refused as urgent.
    pub urgent_window_hours: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("reservations.txt"),
            urgent_window_hours: 24,
        }
    }
}

impl EngineConfig {
    pub fn with_store_path(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.urgent_window()?;
        Ok(config)
    }

    /// The urgency window as a duration. Negative or unrepresentable hour
    /// counts are refused.
    pub fn urgent_window(&self) -> Result<TimeDelta, ConfigError> {
        TimeDelta::try_hours(self.urgent_window_hours)
            .filter(|_| self.urgent_window_hours >= 0)
            .ok_or(ConfigError::InvalidUrgentWindow(self.urgent_window_hours))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "store_path": "/tmp/res.txt" }"#).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/res.txt"));
        assert_eq!(config.urgent_window_hours, 24);

        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "store_path": "data.txt", "urgent_window_hours": 12 }"#).unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.urgent_window_hours, 12);

        assert!(matches!(
            EngineConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_urgent_window_out_of_range() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "urgent_window_hours": 9000000000000 }"#),
            Err(ConfigError::InvalidUrgentWindow(9_000_000_000_000))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "urgent_window_hours": -1 }"#),
            Err(ConfigError::InvalidUrgentWindow(-1))
        ));
        assert_eq!(
            EngineConfig::default().urgent_window().unwrap(),
            TimeDelta::hours(24)
        );
    }
}
