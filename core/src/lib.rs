//! # portaudit core
//!
//! The scanning and analysis engine.
//!
//! * **[`network`]**: the TCP connect probe and hostname resolution, both behind traits.
//! * **[`analysis`]**: static service catalog, vulnerability rules and the risk scorer.
//! * **[`scanner`]**: host scans and the concurrent network fan-out.
//! * **[`models`]**: the immutable result snapshots returned to callers.

pub mod analysis;
pub mod error;
pub mod models;
pub mod network;
pub mod scanner;

pub use error::{Result, ScanError};
pub use models::{HostOutcome, HostResult, NetworkScanResult, PortReport, ScanReport};
pub use scanner::{DEFAULT_TIMEOUT, ScanOptions, Scanner};
