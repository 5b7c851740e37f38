//! The central **entry point** for scanning operations.
//!
//! [`Scanner`] bundles the two pluggable backends of a scan, the
//! [`PortProber`] that touches the network and the [`HostResolver`] that turns
//! names into addresses, and exposes the host and network use cases:
//!
//! * [`Scanner::scan_host`] probes a port list on one host, sequentially.
//! * [`Scanner::scan_network`] fans `scan_host` out over every usable address
//!   of a CIDR range, one task per host, and waits for all of them.
//!
//! High-level callers should depend on this facade rather than on the
//! submodules, so the probing strategy can be swapped without touching them.

use std::sync::Arc;
use std::time::Duration;

use portaudit_common::network::target::Target;
use portaudit_common::ports::PortSet;

use crate::error::Result;
use crate::models::ScanReport;
use crate::network::resolver::{HostResolver, SystemResolver};
use crate::network::tcp::{PortProber, TcpConnectProber};

mod host;
mod network;

/// Per-probe connect timeout when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub ports: PortSet,
    pub timeout: Duration,
    /// Upper bound on hosts scanned at once during a network scan.
    ///
    /// `None` spawns one task per host without any cap.
    pub max_parallel_hosts: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ports: PortSet::default(),
            timeout: DEFAULT_TIMEOUT,
            max_parallel_hosts: None,
        }
    }
}

#[derive(Clone)]
pub struct Scanner {
    prober: Arc<dyn PortProber>,
    resolver: Arc<dyn HostResolver>,
}

impl Scanner {
    /// A scanner doing real TCP connects and system DNS lookups.
    pub fn new() -> Self {
        Self::with_backends(Arc::new(TcpConnectProber), Arc::new(SystemResolver))
    }

    pub fn with_backends(prober: Arc<dyn PortProber>, resolver: Arc<dyn HostResolver>) -> Self {
        Self { prober, resolver }
    }

    /// Dispatches a parsed target to the host or the network scan.
    pub async fn scan_target(&self, target: &Target, options: &ScanOptions) -> Result<ScanReport> {
        match target {
            Target::Network { .. } => {
                let result = self.scan_network(&target.to_string(), options).await?;
                Ok(ScanReport::Network(result))
            }
            Target::Address { .. } | Target::Hostname { .. } => {
                let result = self.scan_host(&target.to_string(), options).await;
                Ok(ScanReport::Host(result))
            }
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}


// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
