//! System snapshot data structures and decoding.
//!
//! A snapshot is the parsed form of one `system_info.json` document. It is
//! rebuilt on every tick and never compared with the previous one.

pub mod data;
pub mod parser;
pub mod uptime;

// Re-export commonly used items
pub use data::{CpuInfo, NetworkInfo, OsInfo, SystemSnapshot};
pub use parser::parse_snapshot;
pub use uptime::{decode_uptime, format_uptime, uptime_since};
