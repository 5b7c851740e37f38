//! Result snapshots handed back to callers.
//!
//! Everything here is built once by the scanner and never mutated afterwards.
//! Key names follow the JSON documents the tool has always produced.

use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::analysis::risk::RiskAnalysis;
use crate::analysis::vulns::Finding;

/// One host's complete outcome.
#[derive(Debug, Clone, Serialize)]
pub struct HostResult {
    pub host: String,
    pub timestamp: DateTime<Local>,
    #[serde(flatten)]
    pub outcome: HostOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HostOutcome {
    Scanned(PortReport),
    /// Terminal per-host failure, no port data was collected.
    Failed { error: String },
}

/// Everything learned about a resolved host.
#[derive(Debug, Clone, Serialize)]
pub struct PortReport {
    pub ip: IpAddr,
    pub open_ports: Vec<u16>,
    pub closed_ports: Vec<u16>,
    /// Service names of open ports only.
    pub services: BTreeMap<u16, String>,
    pub vulnerabilities: Vec<Finding>,
    pub security_analysis: RiskAnalysis,
}

impl HostResult {
    pub fn scanned(host: impl Into<String>, timestamp: DateTime<Local>, report: PortReport) -> Self {
        Self {
            host: host.into(),
            timestamp,
            outcome: HostOutcome::Scanned(report),
        }
    }

    pub fn failed(
        host: impl Into<String>,
        timestamp: DateTime<Local>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            timestamp,
            outcome: HostOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn report(&self) -> Option<&PortReport> {
        match &self.outcome {
            HostOutcome::Scanned(report) => Some(report),
            HostOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            HostOutcome::Scanned(_) => None,
            HostOutcome::Failed { error } => Some(error),
        }
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.report().map(|report| report.ip)
    }
}

/// All host results of one network scan.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkScanResult {
    pub network: String,
    pub hosts: Vec<HostResult>,
}

impl NetworkScanResult {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts that resolved and have at least one open port.
    pub fn responsive_hosts(&self) -> impl Iterator<Item = &HostResult> {
        self.hosts
            .iter()
            .filter(|host| host.report().is_some_and(|r| !r.open_ports.is_empty()))
    }
}

/// Result of scanning a parsed target, whatever its kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScanReport {
    Host(HostResult),
    Network(NetworkScanResult),
}
