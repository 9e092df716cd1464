//! Decoding of raw `system_info.json` payloads.
//!
//! Only a document that is not a JSON object fails as a whole. Everything
//! below the root is read field by field; anything absent or of the wrong
//! shape is left as `None` so the renderer can skip just that slot.

use crate::error::{DashboardError, Result};
use crate::snapshot::data::{CpuInfo, NetworkInfo, OsInfo, SystemSnapshot};
use serde_json::{Map, Value};
use tracing::debug;

/// Prefix of the keys that describe one CPU core.
pub const CORE_KEY_PREFIX: &str = "core_";

/// Parse a raw payload into a [`SystemSnapshot`].
pub fn parse_snapshot(raw: &str) -> Result<SystemSnapshot> {
    let document: Value = serde_json::from_str(raw)?;
    let root = document
        .as_object()
        .ok_or_else(|| DashboardError::malformed("top-level value is not a JSON object"))?;

    Ok(SystemSnapshot {
        os: section(root, "os").map(parse_os),
        cpu: section(root, "cpu").map(parse_cpu),
        network: section(root, "network").map(parse_network),
    })
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Option<&'a Map<String, Value>> {
    match root.get(name) {
        Some(Value::Object(section)) => Some(section),
        Some(other) => {
            debug!("Section {} is not an object: {}", name, other);
            None
        }
        None => {
            debug!("Section {} is missing", name);
            None
        }
    }
}

fn parse_os(os: &Map<String, Value>) -> OsInfo {
    OsInfo {
        distribution: string_field(os, "os", "distribution"),
        kernel_version: string_field(os, "os", "kernel_version"),
        uptime: string_field(os, "os", "uptime"),
    }
}

fn parse_cpu(cpu: &Map<String, Value>) -> CpuInfo {
    let cores = match cpu.get("cores") {
        Some(cores) => count_cores(cores)
            .map_err(|e| debug!("Skipping cpu.cores: {}", e))
            .ok(),
        None => None,
    };

    CpuInfo {
        hardware: string_field(cpu, "cpu", "hardware"),
        architecture: string_field(cpu, "cpu", "architecture"),
        architecture_type: string_field(cpu, "cpu", "architecture_type"),
        cpu_type: string_field(cpu, "cpu", "type"),
        cores,
    }
}

fn parse_network(network: &Map<String, Value>) -> NetworkInfo {
    NetworkInfo {
        devices: network.keys().cloned().collect(),
    }
}

/// Read a leaf as text. Numbers and booleans are accepted in their JSON form.
fn string_field(object: &Map<String, Value>, section: &str, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            debug!("Skipping {}.{}: expected a string, got {}", section, key, other);
            None
        }
    }
}

/// Count the `core_*` keys of a `cpu.cores` object.
pub fn count_cores(cores: &Value) -> Result<usize> {
    let cores = cores
        .as_object()
        .ok_or_else(|| DashboardError::parse_error("cpu.cores is not an object"))?;
    Ok(cores
        .keys()
        .filter(|key| key.starts_with(CORE_KEY_PREFIX))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL: &str = r#"{
        "os": {"distribution": "Ubuntu 22.04 LTS", "kernel_version": "5.15.0-91-generic", "uptime": "1700000000.873412"},
        "cpu": {"hardware": "AMD Ryzen 7 5800X", "architecture": "x86_64", "architecture_type": "64-bit",
                "type": "GenuineAMD", "cores": {"core_0": {"mhz": 3800}, "core_1": {}, "temperature": {}}},
        "network": {"eth0": {}, "lo": {}, "wlan0": {}}
    }"#;

    #[test]
    fn test_parse_full_document() {
        let snapshot = parse_snapshot(FULL).unwrap();

        let os = snapshot.os.unwrap();
        assert_eq!(os.distribution.as_deref(), Some("Ubuntu 22.04 LTS"));
        assert_eq!(os.kernel_version.as_deref(), Some("5.15.0-91-generic"));
        assert_eq!(os.boot_time_millis().unwrap(), 1_700_000_000_870);

        let cpu = snapshot.cpu.unwrap();
        assert_eq!(cpu.hardware.as_deref(), Some("AMD Ryzen 7 5800X"));
        assert_eq!(cpu.cpu_type.as_deref(), Some("GenuineAMD"));
        assert_eq!(cpu.cores, Some(2));

        assert_eq!(snapshot.network.unwrap().device_count(), 3);
    }

    #[test]
    fn test_core_counting_ignores_other_keys() {
        let cores = json!({"core_0": {}, "core_1": {}, "other": {}});
        assert_eq!(count_cores(&cores).unwrap(), 2);
        assert!(count_cores(&json!("4")).is_err());
    }

    #[test]
    fn test_device_counting() {
        let snapshot = parse_snapshot(r#"{"network": {"eth0": {}, "lo": {}}}"#).unwrap();
        let network = snapshot.network.unwrap();
        assert_eq!(network.device_count(), 2);
        assert_eq!(network.devices, vec!["eth0".to_string(), "lo".to_string()]);

        let empty = parse_snapshot(r#"{"network": {}}"#).unwrap();
        assert_eq!(empty.network.unwrap().device_count(), 0);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_snapshot(r#"{"os": {"distribution": "Ubu"#).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse(_)));

        let err = parse_snapshot("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_sections_are_not_fatal() {
        let snapshot = parse_snapshot(r#"{"os": {"kernel_version": "6.1.0"}}"#).unwrap();
        assert!(snapshot.cpu.is_none());
        assert!(snapshot.network.is_none());

        let os = snapshot.os.unwrap();
        assert!(os.distribution.is_none());
        assert!(matches!(os.boot_time_millis(), Err(DashboardError::MissingField(_))));

        assert!(parse_snapshot("{}").unwrap().is_empty());
    }

    #[test]
    fn test_mistyped_leaves_are_skipped() {
        let snapshot = parse_snapshot(
            r#"{"os": {"distribution": ["x"], "kernel_version": null},
                "cpu": {"cores": 4, "type": 7},
                "network": "eth0"}"#,
        )
        .unwrap();

        let os = snapshot.os.unwrap();
        assert!(os.distribution.is_none());
        assert!(os.kernel_version.is_none());

        let cpu = snapshot.cpu.unwrap();
        assert!(cpu.cores.is_none());
        assert_eq!(cpu.cpu_type.as_deref(), Some("7"));

        assert!(snapshot.network.is_none());
    }
}
