//! Call-level errors of the scanning engine.
//!
//! Per-port and per-host failures never show up here, they are encoded in the
//! returned [`HostResult`](crate::models::HostResult) instead.

use portaudit_common::network::range::RangeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The network range could not be parsed; no host was scanned.
    #[error("Invalid network format: {0}")]
    InvalidNetwork(#[from] RangeError),
}
