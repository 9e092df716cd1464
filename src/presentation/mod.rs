//! Presentation mapping: snapshot values to display labels and icon categories.

pub mod icons;
pub mod mapper;

// Re-export commonly used items
pub use icons::{CpuIcon, DistributionIcon, Icon, IconRules, CPU_RULES, DISTRIBUTION_RULES};
pub use mapper::present;
