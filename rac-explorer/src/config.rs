//! Configuration management
//!
//! Handles:
//! - `rac` location, RAS endpoint and cluster credentials
//! - Sampling interval and enabled explorers
//! - HTTP listen address for the metrics endpoint
//!
//! The file is TOML. Its path comes from `RAC_EXPLORER_CONFIG` or defaults to
//! the OS config directory; a missing file means defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::explorers::available_performance;
use crate::rac::DEFAULT_RAC_PATH;

pub const CONFIG_PATH_ENV: &str = "RAC_EXPLORER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub rac: RacConfig,
    pub explorer: SchedulerConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RacConfig {
    pub path: PathBuf,
    pub ras_address: Option<String>,
    pub cluster_user: Option<String>,
    #[serde(skip_serializing)] // Never write passwords back
    pub cluster_password: Option<String>,
    pub command_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_secs: u64,
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub listen: SocketAddr,
}

impl Default for RacConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_RAC_PATH),
            ras_address: None,
            cluster_user: None,
            cluster_password: None,
            command_timeout_secs: None,
        }
    }
}

impl RacConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            enabled: vec![available_performance::NAME.to_string()],
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 9101)),
        }
    }
}

impl ExplorerConfig {
    /// Load config from `RAC_EXPLORER_CONFIG` or the OS-specific location
    pub async fn load() -> Result<Self> {
        Self::load_explicit_or_default(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)).await
    }

    /// An explicit path must exist; only the implicit location falls back to defaults
    async fn load_explicit_or_default(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Config file {} (from {}) does not exist",
                        path.display(),
                        CONFIG_PATH_ENV
                    );
                }
                Self::read_file(&path).await
            }
            None => Self::load_from(&Self::config_file_path()?).await,
        }
    }

    /// Load config from `path`, falling back to defaults when it does not exist
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::read_file(path).await
    }

    async fn read_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ExplorerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.explorer.interval_secs == 0 {
            bail!("explorer.interval_secs must be greater than zero");
        }
        if self.rac.path.as_os_str().is_empty() {
            bail!("rac.path must not be empty");
        }
        if self.rac.command_timeout_secs == Some(0) {
            bail!("rac.command_timeout_secs must be greater than zero when set");
        }
        Ok(())
    }

    /// Get OS-specific config file path
    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

        path.push("rac-explorer");
        path.push("config.toml");
        Ok(path)
    }
}
