//! Dashboard configuration and the user-settable API address.

use crate::error::{DashboardError, Result};
use crate::poller::{Endpoint, Schedule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Configuration of one polling dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Endpoint polled at start-up
    pub endpoint: Endpoint,
    /// Time between ticks in milliseconds
    pub interval_ms: u64,
    /// Delay before the first tick in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for a single fetch in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Http(crate::DEFAULT_ENDPOINT.to_string()),
            interval_ms: crate::DEFAULT_INTERVAL_MS,
            initial_delay_ms: crate::DEFAULT_INITIAL_DELAY_MS,
            fetch_timeout_ms: crate::DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl DashboardConfig {
    /// Create a configuration polling `endpoint` with default timings.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }

    /// Set the polling interval.
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set the delay before the first tick.
    pub fn with_initial_delay_ms(mut self, initial_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout_ms(mut self, fetch_timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = fetch_timeout_ms;
        self
    }

    /// Reject timings the scheduler cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(DashboardError::config_error("polling interval must be greater than zero"));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(DashboardError::config_error("fetch timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            interval: Duration::from_millis(self.interval_ms),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Address of the `system_info.json` endpoint
    pub api_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_address: crate::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                DashboardError::config_error(format!("Invalid settings file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::config_error(e.to_string()))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        self.api_address.parse()
    }
}

/// The API address currently polled, shared between the poller and whoever
/// may change it. Every tick reads the latest value.
#[derive(Debug, Clone)]
pub struct ApiAddress {
    current: Arc<watch::Sender<Endpoint>>,
    settings_path: Option<PathBuf>,
}

impl ApiAddress {
    pub fn new(endpoint: Endpoint) -> Self {
        let (current, _) = watch::channel(endpoint);
        Self {
            current: Arc::new(current),
            settings_path: None,
        }
    }

    /// Persist every change to `path`.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// The endpoint the next tick will poll.
    pub fn current(&self) -> Endpoint {
        self.current.borrow().clone()
    }

    /// Change the polled endpoint, persisting it when a settings path is set.
    pub async fn set(&self, endpoint: Endpoint) -> Result<()> {
        if let Some(path) = &self.settings_path {
            Settings {
                api_address: endpoint.to_string(),
            }
            .save(path)
            .await?;
        }
        info!("API address set to {}", endpoint);
        self.current.send_replace(endpoint);
        Ok(())
    }
}
