//! Configuration types for the indexer admin dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::session::PollIntervals;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            dashboard: DashboardConfig::default(),
            export_file_name: default_export_file_name(),
        }
    }
}

/// Where the indexer configuration API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Refresh cadences of the index table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_configs_interval", with = "humantime_serde")]
    pub configs_interval: Duration,
    #[serde(default = "default_running_interval", with = "humantime_serde")]
    pub running_interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            configs_interval: default_configs_interval(),
            running_interval: default_running_interval(),
        }
    }
}

impl From<&PollingConfig> for PollIntervals {
    fn from(config: &PollingConfig) -> Self {
        Self {
            configs: config.configs_interval,
            running: config.running_interval,
        }
    }
}

/// Dashboard web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/".to_string()
}

fn default_configs_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_running_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11116
}

fn default_export_file_name() -> String {
    "indexer-configs.conf".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::AdminError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(crate::AdminError::Config(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        if self.polling.configs_interval.is_zero() || self.polling.running_interval.is_zero() {
            return Err(crate::AdminError::Config(
                "polling intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
