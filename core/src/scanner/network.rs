use std::net::IpAddr;
use std::sync::Arc;

use chrono::Local;
use pnet::ipnetwork::Ipv4Network;
use portaudit_common::network::range;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::models::{HostResult, NetworkScanResult};

use super::{ScanOptions, Scanner};

const LARGE_NETWORK_HOSTS: u64 = 254;
pub(crate) const HOST_SCAN_FAILED: &str = "Host scan failed";

impl Scanner {
    /// Scans every usable address of a CIDR range.
    ///
    /// One task is spawned per address and all of them are awaited before
    /// returning; nothing is handed back early. A malformed range is the only
    /// error, in which case no host is touched.
    pub async fn scan_network(&self, cidr: &str, options: &ScanOptions) -> Result<NetworkScanResult> {
        let network = range::parse_cidr(cidr).inspect_err(|e| {
            error!("Invalid network format {cidr}: {e}");
        })?;

        Ok(self.scan_range(network, options).await)
    }

    async fn scan_range(&self, network: Ipv4Network, options: &ScanOptions) -> NetworkScanResult {
        let label = format!("{}/{}", network.network(), network.prefix());
        let hosts = range::usable_hosts(&network);

        info!("Starting network scan for {label}");
        if hosts.len() > LARGE_NETWORK_HOSTS {
            warn!("Large network scan requested: {} hosts", hosts.len());
        }

        let options = Arc::new(options.clone());
        let limiter = options
            .max_parallel_hosts
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let handles: Vec<(IpAddr, JoinHandle<HostResult>)> = hosts
            .to_iter()
            .map(|ip| (ip, self.spawn_host_scan(ip, options.clone(), limiter.clone())))
            .collect();

        let mut results: Vec<HostResult> = Vec::with_capacity(handles.len());
        for (ip, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Error scanning host {ip}: {e}");
                    results.push(HostResult::failed(ip.to_string(), Local::now(), HOST_SCAN_FAILED));
                }
            }
        }

        info!("Completed network scan for {label}: {} hosts scanned", results.len());
        NetworkScanResult {
            network: label,
            hosts: results,
        }
    }

    // Each task owns its result, the caller merges them after joining.
    fn spawn_host_scan(
        &self,
        ip: IpAddr,
        options: Arc<ScanOptions>,
        limiter: Option<Arc<Semaphore>>,
    ) -> JoinHandle<HostResult> {
        let scanner = self.clone();
        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            scanner.scan_host(&ip.to_string(), &options).await
        })
    }
}
