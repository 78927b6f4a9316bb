//! Application configuration handling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;

/// Directory under the user config dir holding the persisted registries.
pub const DEFAULT_DATA_DIR: &str = "bowlhall/data";
/// Location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "bowlhall/config.toml";

/// Runtime configuration for the hall core.
///
/// Every field has a default, so a missing or empty configuration file
/// yields a working setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HallConfig {
    /// Directory the registry documents are stored in.
    pub data_root: PathBuf,
    /// Number of lanes bootstrapped when none are persisted.
    pub lane_count: u32,
    /// Default reservation length for a match, in minutes.
    pub match_duration_minutes: i64,
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            lane_count: 10,
            match_duration_minutes: 60,
        }
    }
}

impl HallConfig {
    /// Load from the default configuration file, falling back to
    /// defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific file path. A missing file yields defaults;
    /// a malformed one is an error.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.into()).required(false))
            .build()
            .context("failed to read configuration")?;
        settings.try_deserialize().context("invalid configuration")
    }

    /// Default reservation length as a duration.
    pub fn match_duration(&self) -> Duration {
        Duration::minutes(self.match_duration_minutes)
    }
}

/// Default storage root under the user's config directory.
pub fn default_data_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = HallConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.lane_count, 10);
        assert_eq!(config.match_duration(), Duration::hours(1));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "lane_count = 6\nmatch_duration_minutes = 30\ndata_root = \"/tmp/hall\"\n",
        )?;
        let config = HallConfig::load_from(path)?;
        assert_eq!(config.lane_count, 6);
        assert_eq!(config.match_duration(), Duration::minutes(30));
        assert_eq!(config.data_root, PathBuf::from("/tmp/hall"));
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "lane_count = \"many\"")?;
        assert!(HallConfig::load_from(path).is_err());
        Ok(())
    }
}
