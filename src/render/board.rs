//! The set of named display slots and the rendering policy applied to them.

use crate::presentation::{self, Icon};
use crate::snapshot::SystemSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Distribution,
    Kernel,
    Uptime,
    CpuName,
    CpuArchitecture,
    CpuType,
    CpuCores,
    NetworkDevices,
    DistributionImage,
    CpuImage,
}

impl Slot {
    /// Every slot, in display order.
    pub const ALL: [Slot; 10] = [
        Slot::DistributionImage,
        Slot::Distribution,
        Slot::Kernel,
        Slot::Uptime,
        Slot::CpuImage,
        Slot::CpuName,
        Slot::CpuArchitecture,
        Slot::CpuType,
        Slot::CpuCores,
        Slot::NetworkDevices,
    ];

    /// Stable identifier, also used as the HTML element id suffix.
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Distribution => "distribution",
            Slot::Kernel => "kernel",
            Slot::Uptime => "uptime",
            Slot::CpuName => "cpu_name",
            Slot::CpuArchitecture => "cpu_architecture",
            Slot::CpuType => "cpu_type",
            Slot::CpuCores => "cpu_cores",
            Slot::NetworkDevices => "network_devices",
            Slot::DistributionImage => "distribution_image",
            Slot::CpuImage => "cpu_image",
        }
    }
}

/// Content of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SlotValue {
    Text(String),
    Icon(Icon),
}

/// One pending write to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub slot: Slot,
    pub value: SlotValue,
}

impl SlotUpdate {
    pub fn text(slot: Slot, text: impl Into<String>) -> Self {
        Self {
            slot,
            value: SlotValue::Text(text.into()),
        }
    }

    pub fn icon(slot: Slot, icon: Icon) -> Self {
        Self {
            slot,
            value: SlotValue::Icon(icon),
        }
    }
}

/// Renders snapshots onto a set of display slots.
pub trait Renderer {
    /// Render one tick's snapshot, or nothing if the tick failed.
    ///
    /// Returns the number of slots whose content changed.
    fn render(&mut self, snapshot: Option<&SystemSnapshot>, now: DateTime<Utc>) -> usize;
}

/// Notified after a render changed the board.
pub trait BoardObserver: Send {
    fn board_changed(&mut self, board: &Board);
}

/// The display state: what every slot currently shows.
///
/// Slots never written stay absent. A slot is only overwritten when a new
/// tick supplies a present, non-empty value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: BTreeMap<Slot, SlotValue>,
    /// When a render last changed any slot
    updated_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    /// Text content of a slot, if it holds text.
    pub fn text(&self, slot: Slot) -> Option<&str> {
        match self.slots.get(&slot) {
            Some(SlotValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Icon content of a slot, if it holds an icon.
    pub fn icon(&self, slot: Slot) -> Option<Icon> {
        match self.slots.get(&slot) {
            Some(SlotValue::Icon(icon)) => Some(*icon),
            _ => None,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Filled slots, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &SlotValue)> {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.slots.get(&slot).map(|value| (slot, value)))
    }

    /// Write updates, returning how many slots actually changed.
    pub fn apply(&mut self, updates: impl IntoIterator<Item = SlotUpdate>, now: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for update in updates {
            if self.slots.get(&update.slot) != Some(&update.value) {
                self.slots.insert(update.slot, update.value);
                changed += 1;
            }
        }
        if changed > 0 {
            self.updated_at = Some(now);
        }
        changed
    }
}

impl Renderer for Board {
    fn render(&mut self, snapshot: Option<&SystemSnapshot>, now: DateTime<Utc>) -> usize {
        match snapshot {
            Some(snapshot) => self.apply(presentation::present(snapshot, now), now),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::DistributionIcon;
    use crate::snapshot::parse_snapshot;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_100, 0).unwrap()
    }

    const DOCUMENT: &str = r#"{
        "os": {"distribution": "Raspbian GNU/Linux 11", "kernel_version": "6.1.21-v8+", "uptime": "1700000000.00"},
        "cpu": {"hardware": "BCM2835", "architecture": "aarch64", "architecture_type": "64-bit",
                "type": "ARMv8", "cores": {"core_0": {}, "core_1": {}, "core_2": {}, "core_3": {}}},
        "network": {"eth0": {}, "wlan0": {}}
    }"#;

    #[test]
    fn test_render_fills_every_slot() {
        let snapshot = parse_snapshot(DOCUMENT).unwrap();
        let mut board = Board::new();

        assert_eq!(board.render(Some(&snapshot), now()), Slot::ALL.len());
        assert_eq!(board.text(Slot::Uptime), Some("Uptime: 00:00:01:40"));
        assert_eq!(board.text(Slot::CpuCores), Some("Cores: 4"));
        assert_eq!(
            board.icon(Slot::DistributionImage),
            Some(Icon::Distribution(DistributionIcon::Raspbian))
        );
        assert_eq!(board.updated_at(), Some(now()));
    }

    #[test]
    fn test_render_is_idempotent() {
        let snapshot = parse_snapshot(DOCUMENT).unwrap();
        let mut board = Board::new();
        board.render(Some(&snapshot), now());
        let before = board.clone();

        assert_eq!(board.render(Some(&snapshot), now()), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_absent_snapshot_is_a_no_op() {
        let snapshot = parse_snapshot(DOCUMENT).unwrap();
        let mut board = Board::new();
        board.render(Some(&snapshot), now());
        let before = board.clone();

        assert_eq!(board.render(None, now()), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_missing_fields_keep_previous_content() {
        let mut board = Board::new();
        board.render(Some(&parse_snapshot(DOCUMENT).unwrap()), now());

        let partial = parse_snapshot(
            r#"{"os": {"distribution": "", "kernel_version": "6.6.0"}, "cpu": {"hardware": "   "}}"#,
        )
        .unwrap();
        assert_eq!(board.render(Some(&partial), now()), 1);

        assert_eq!(board.text(Slot::Kernel), Some("Kernel: 6.6.0"));
        assert_eq!(board.text(Slot::Distribution), Some("Distribution: Raspbian GNU/Linux 11"));
        assert_eq!(board.text(Slot::CpuName), Some("CPU: BCM2835"));
        assert_eq!(board.text(Slot::NetworkDevices), Some("Network Devices: 2"));
    }

    #[test]
    fn test_iter_follows_display_order() {
        let mut board = Board::new();
        board.apply(
            [
                SlotUpdate::text(Slot::NetworkDevices, "Network Devices: 1"),
                SlotUpdate::text(Slot::Kernel, "Kernel: 6.1"),
            ],
            now(),
        );
        let order: Vec<Slot> = board.iter().map(|(slot, _)| slot).collect();
        assert_eq!(order, [Slot::Kernel, Slot::NetworkDevices]);
    }
}
