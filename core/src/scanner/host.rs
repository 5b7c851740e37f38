use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};

use chrono::Local;
use tracing::{debug, error, info};

use crate::analysis::{risk, services, vulns};
use crate::models::{HostResult, PortReport};
use crate::network::resolver;
use crate::network::tcp::PortOutcome;

use super::{ScanOptions, Scanner};

pub(crate) const RESOLUTION_FAILED: &str = "Host resolution failed";

impl Scanner {
    /// Scans a single host for open ports.
    ///
    /// Ports are probed one at a time in the order of `options.ports`. A port
    /// that errors out is reported as closed and the scan moves on; only a
    /// failed resolution ends the scan early.
    pub async fn scan_host(&self, target: &str, options: &ScanOptions) -> HostResult {
        info!("Starting host scan for {target}");
        let timestamp = Local::now();

        let ip: IpAddr = match resolver::resolve_target(self.resolver.as_ref(), target).await {
            Ok(ip) => {
                debug!("Resolved {target} to {ip}");
                ip
            }
            Err(e) => {
                error!("Failed to resolve host {target}: {e}");
                return HostResult::failed(target, timestamp, RESOLUTION_FAILED);
            }
        };

        let mut open_ports: Vec<u16> = Vec::new();
        let mut closed_ports: Vec<u16> = Vec::new();

        for port in options.ports.iter() {
            let addr = SocketAddr::new(ip, port);
            match self.prober.probe(addr, options.timeout).await {
                PortOutcome::Open => {
                    debug!("Port {port} is open on {target}");
                    open_ports.push(port);
                }
                PortOutcome::Closed => closed_ports.push(port),
                PortOutcome::Error(kind) => {
                    debug!("Error scanning port {port} on {target}: {kind}");
                    closed_ports.push(port);
                }
            }
        }

        let report = assemble_report(ip, open_ports, closed_ports);
        info!(
            "Completed host scan for {target}: {} open ports found",
            report.open_ports.len()
        );

        HostResult::scanned(target, timestamp, report)
    }
}

/// Builds the per-host report from the probe buckets.
///
/// Only open ports get a service name and findings; the risk analysis is
/// derived from the open ports alone.
fn assemble_report(ip: IpAddr, mut open_ports: Vec<u16>, mut closed_ports: Vec<u16>) -> PortReport {
    open_ports.sort_unstable();
    closed_ports.sort_unstable();

    let mut services_map: BTreeMap<u16, String> = BTreeMap::new();
    let mut vulnerabilities: Vec<vulns::Finding> = Vec::new();

    for &port in &open_ports {
        let service = services::lookup(port);
        vulnerabilities.extend(vulns::findings(port, service));
        services_map.insert(port, service.to_string());
    }

    let security_analysis = risk::analyze(&open_ports);

    PortReport {
        ip,
        open_ports,
        closed_ports,
        services: services_map,
        vulnerabilities,
        security_analysis,
    }
}
