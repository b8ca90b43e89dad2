//! Domain logic for stats forwarding
//!
//! - `stats` - Snapshot sanitization and skip lists
//! - `forward` - Fire-and-forget delivery to the metrics store
//! - `report` - Optional in-memory diagnostic report
//! - `bridge` - Harness plugin instance tying the above together

pub mod bridge;
pub mod forward;
pub mod report;
pub mod stats;

pub use bridge::{StatsBridge, StatsReport};
pub use forward::{ReportForwarder, ReportKind};
pub use report::{DiagnosticRecord, DiagnosticReport};
pub use stats::{SanitizeError, SkipList, sanitize};
