//! Icon categories chosen by ordered substring rules.

use serde::{Deserialize, Serialize};

/// An ordered rule table: the first needle contained in the lowercased input
/// wins, otherwise the fallback is used.
#[derive(Debug, Clone, Copy)]
pub struct IconRules<T: 'static> {
    rules: &'static [(&'static str, T)],
    fallback: T,
}

impl<T: Copy> IconRules<T> {
    /// Build a rule table. Needles must be lowercase.
    pub const fn new(rules: &'static [(&'static str, T)], fallback: T) -> Self {
        Self { rules, fallback }
    }

    /// Choose the category for `value`.
    pub fn classify(&self, value: &str) -> T {
        let value = value.to_lowercase();
        self.rules
            .iter()
            .find(|(needle, _)| value.contains(needle))
            .map(|&(_, category)| category)
            .unwrap_or(self.fallback)
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &'static [(&'static str, T)] {
        self.rules
    }
}

/// Distribution logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionIcon {
    Ubuntu,
    Debian,
    Raspbian,
    Default,
}

/// CPU vendor logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuIcon {
    Amd,
    Intel,
    Broadcom,
    Default,
}

pub const DISTRIBUTION_RULES: IconRules<DistributionIcon> = IconRules::new(
    &[
        ("ubuntu", DistributionIcon::Ubuntu),
        ("debian", DistributionIcon::Debian),
        ("raspbian", DistributionIcon::Raspbian),
        ("raspberry", DistributionIcon::Raspbian),
    ],
    DistributionIcon::Default,
);

// Raspberry Pi boards report their SoC as "BCM2835" and friends.
pub const CPU_RULES: IconRules<CpuIcon> = IconRules::new(
    &[
        ("amd", CpuIcon::Amd),
        ("intel", CpuIcon::Intel),
        ("broadcom", CpuIcon::Broadcom),
        ("bcm", CpuIcon::Broadcom),
    ],
    CpuIcon::Default,
);

impl DistributionIcon {
    /// Classify a free-text distribution name.
    pub fn classify(distribution: &str) -> Self {
        DISTRIBUTION_RULES.classify(distribution)
    }

    /// Themed asset file for this logo.
    pub fn asset(&self) -> &'static str {
        match self {
            Self::Ubuntu => "ubuntu.svg",
            Self::Debian => "debian.svg",
            Self::Raspbian => "raspberry.svg",
            Self::Default => "linux.svg",
        }
    }
}

impl CpuIcon {
    /// Classify a CPU hardware string.
    pub fn classify(hardware: &str) -> Self {
        CPU_RULES.classify(hardware)
    }

    /// Themed asset file for this logo.
    pub fn asset(&self) -> &'static str {
        match self {
            Self::Amd => "amd.svg",
            Self::Intel => "intel.svg",
            Self::Broadcom => "broadcom.svg",
            Self::Default => "cpu.svg",
        }
    }
}

/// Any icon a display slot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", content = "category", rename_all = "snake_case")]
pub enum Icon {
    Distribution(DistributionIcon),
    Cpu(CpuIcon),
}

impl Icon {
    /// Themed asset file for this icon.
    pub fn asset(&self) -> &'static str {
        match self {
            Self::Distribution(icon) => icon.asset(),
            Self::Cpu(icon) => icon.asset(),
        }
    }
}
