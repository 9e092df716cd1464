//! Data structures for a polled system snapshot.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

/// One decoded `system_info.json` document.
///
/// Every section and every leaf is optional: the collector on the monitored
/// host may omit anything, and an absent value only means "do not update".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Operating system section
    pub os: Option<OsInfo>,
    /// CPU section
    pub cpu: Option<CpuInfo>,
    /// Network section
    pub network: Option<NetworkInfo>,
}

/// Operating system information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    /// Free-text distribution name (e.g. "Ubuntu 22.04 LTS")
    pub distribution: Option<String>,
    /// Kernel release string
    pub kernel_version: Option<String>,
    /// Boot timestamp as published, `"<seconds>.<fraction>"`
    pub uptime: Option<String>,
}

/// CPU information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Hardware / model name (e.g. "BCM2835", "AMD Ryzen 7 5800X")
    pub hardware: Option<String>,
    /// Architecture (e.g. "aarch64")
    pub architecture: Option<String>,
    /// Architecture width (e.g. "64-bit")
    pub architecture_type: Option<String>,
    /// CPU type
    #[serde(rename = "type")]
    pub cpu_type: Option<String>,
    /// Number of `core_*` entries in the cores object
    pub cores: Option<usize>,
}

/// Network device information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Device names, in document key order
    pub devices: Vec<String>,
}

impl OsInfo {
    /// Decode the published boot timestamp into milliseconds since the epoch.
    pub fn boot_time_millis(&self) -> Result<i64> {
        let raw = self
            .uptime
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| DashboardError::missing_field("os.uptime"))?;
        super::uptime::decode_uptime(raw)
    }
}

impl NetworkInfo {
    /// Number of network devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl SystemSnapshot {
    /// Whether the document carried none of the known sections.
    pub fn is_empty(&self) -> bool {
        self.os.is_none() && self.cpu.is_none() && self.network.is_none()
    }
}
