use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub history_limit: Option<usize>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Read a config file, treating a missing file as the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Take every value set in `other`. Returns whether anything changed.
    pub fn merge(&mut self, other: Config) -> bool {
        let before = self.clone();
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.poll_interval_secs.is_some() {
            self.poll_interval_secs = other.poll_interval_secs;
        }
        if other.history_limit.is_some() {
            self.history_limit = other.history_limit;
        }
        *self != before
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Health poll interval; zero is raised to one second.
    pub fn poll_interval(&self) -> Duration {
        let secs = self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(1)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatline").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.history_limit(), 20);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            base_url: Some("http://chat.internal:8080".to_string()),
            poll_interval_secs: Some(10),
            history_limit: Some(5),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn zero_values_are_clamped() {
        let config = Config {
            base_url: None,
            poll_interval_secs: Some(0),
            history_limit: Some(0),
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.history_limit(), 1);
    }

    #[test]
    fn merge_overrides_only_given_values() {
        let mut config = Config {
            base_url: Some("http://old:5000".to_string()),
            poll_interval_secs: Some(10),
            history_limit: None,
        };
        let changed = config.merge(Config {
            history_limit: Some(50),
            ..Config::new()
        });

        assert!(changed);
        assert_eq!(config.base_url(), "http://old:5000");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.history_limit(), 50);
        assert!(!config.clone().merge(Config::new()));
        assert!(!config.clone().merge(config.clone()));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
