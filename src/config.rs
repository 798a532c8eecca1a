//! Top-level runtime configuration.
//!
//! Configuration is stored in `.glassdeck/config.yaml` and includes:
//! - The default log filter
//! - List paging and detail auto-scroll timing
//! - Feed fetch timeout
//! - Location of the simulator's storage file

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GlassError, Result};
use crate::paths::{config_path, glassdeck_root};
use crate::selection::MAX_ROWS_PER_PAGE;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing` filter directive used when `GLASSDECK_LOG` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    /// Rows per list page, controls included (default: 20)
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,

    /// Detail auto-scroll interval in milliseconds (default: 2500)
    #[serde(default = "default_autoscroll_interval_ms")]
    pub autoscroll_interval_ms: u64,

    /// Per-feed fetch timeout in seconds (default: 15)
    #[serde(default = "default_feed_timeout_secs")]
    pub feed_timeout_secs: u64,

    /// Storage file of the simulator bridge (default: `<root>/storage.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,
}

fn default_rows_per_page() -> usize {
    MAX_ROWS_PER_PAGE
}

fn default_autoscroll_interval_ms() -> u64 {
    2500
}

fn default_feed_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: None,
            rows_per_page: default_rows_per_page(),
            autoscroll_interval_ms: default_autoscroll_interval_ms(),
            feed_timeout_secs: default_feed_timeout_secs(),
            storage_file: None,
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let content = serde_yaml_ng::to_string(self)?;
        crate::utils::write_file_atomic(&config_path(), &content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page < 2 {
            return Err(GlassError::Config(format!(
                "rows_per_page must be at least 2, got {}",
                self.rows_per_page
            )));
        }
        if self.autoscroll_interval_ms < 100 {
            return Err(GlassError::Config(format!(
                "autoscroll_interval_ms must be at least 100, got {}",
                self.autoscroll_interval_ms
            )));
        }
        if self.feed_timeout_secs == 0 {
            return Err(GlassError::Config(
                "feed_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn autoscroll_interval(&self) -> Duration {
        Duration::from_millis(self.autoscroll_interval_ms)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_file
            .clone()
            .unwrap_or_else(|| glassdeck_root().join("storage.json"))
    }
}
