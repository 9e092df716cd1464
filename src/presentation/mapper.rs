//! Mapping from a snapshot to display slot updates.

use crate::error::DashboardError;
use crate::presentation::icons::{CpuIcon, DistributionIcon, Icon};
use crate::render::{Slot, SlotUpdate};
use crate::snapshot::{format_uptime, uptime_since, CpuInfo, OsInfo, SystemSnapshot};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Build the slot updates for one snapshot.
///
/// Absent, empty or undecodable values produce no update for their slot.
pub fn present(snapshot: &SystemSnapshot, now: DateTime<Utc>) -> Vec<SlotUpdate> {
    let mut updates = Vec::with_capacity(Slot::ALL.len());

    if let Some(os) = &snapshot.os {
        present_os(os, now, &mut updates);
    }
    if let Some(cpu) = &snapshot.cpu {
        present_cpu(cpu, &mut updates);
    }
    if let Some(network) = &snapshot.network {
        updates.push(SlotUpdate::text(
            Slot::NetworkDevices,
            format!("Network Devices: {}", network.device_count()),
        ));
    }

    updates
}

fn present_os(os: &OsInfo, now: DateTime<Utc>, updates: &mut Vec<SlotUpdate>) {
    if let Some(distribution) = non_empty(&os.distribution) {
        updates.push(SlotUpdate::text(
            Slot::Distribution,
            format!("Distribution: {distribution}"),
        ));
        updates.push(SlotUpdate::icon(
            Slot::DistributionImage,
            Icon::Distribution(DistributionIcon::classify(distribution)),
        ));
    }

    if let Some(kernel) = non_empty(&os.kernel_version) {
        updates.push(SlotUpdate::text(Slot::Kernel, format!("Kernel: {kernel}")));
    }

    match os.boot_time_millis() {
        Ok(boot) => updates.push(SlotUpdate::text(
            Slot::Uptime,
            format!("Uptime: {}", format_uptime(uptime_since(boot, now))),
        )),
        Err(DashboardError::MissingField(_)) => {}
        Err(e) => debug!("Keeping previous uptime: {}", e),
    }
}

fn present_cpu(cpu: &CpuInfo, updates: &mut Vec<SlotUpdate>) {
    if let Some(hardware) = non_empty(&cpu.hardware) {
        updates.push(SlotUpdate::text(Slot::CpuName, format!("CPU: {hardware}")));
        updates.push(SlotUpdate::icon(
            Slot::CpuImage,
            Icon::Cpu(CpuIcon::classify(hardware)),
        ));
    }

    if let Some(architecture) = non_empty(&cpu.architecture) {
        let label = match non_empty(&cpu.architecture_type) {
            Some(kind) => format!("Architecture: {kind} - {architecture}"),
            None => format!("Architecture: {architecture}"),
        };
        updates.push(SlotUpdate::text(Slot::CpuArchitecture, label));
    }

    if let Some(cpu_type) = non_empty(&cpu.cpu_type) {
        updates.push(SlotUpdate::text(Slot::CpuType, format!("Type: {cpu_type}")));
    }

    if let Some(cores) = cpu.cores {
        updates.push(SlotUpdate::text(Slot::CpuCores, format!("Cores: {cores}")));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
