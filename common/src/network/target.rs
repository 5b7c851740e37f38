//! # Scan Target Model
//!
//! Defines the possible inputs for a scan.
//!
//! This module handles parsing and representing targets, which can be:
//! * A single IP address (host).
//! * A hostname that still has to be resolved.
//! * A CIDR block (e.g., `192.168.1.0/24`).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use pnet::ipnetwork::Ipv4Network;
use regex::Regex;

use crate::network::range;

const MAX_HOSTNAME_LEN: usize = 253;

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.?$",
    )
    .expect("hostname pattern is valid")
});

/// Represents a distinct target to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Scan a single literal address.
    Address { addr: IpAddr },
    /// Scan a single host by name, resolved right before probing.
    Hostname { name: String },
    /// Scan every usable address of an IPv4 network.
    Network { network: Ipv4Network },
}

impl Target {
    pub fn is_network(&self) -> bool {
        matches!(self, Target::Network { .. })
    }
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Host**: Single IPv4/IPv6 address (e.g., "192.168.1.5").
    /// * **CIDR**: "Network/Prefix" (e.g., "192.168.1.0/24").
    /// * **Hostname**: RFC 1123 name (e.g., "scanme.example.org").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err("target cannot be empty".to_string());
        }

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if s.contains('/') {
            return range::parse_cidr(s)
                .map(|network| Target::Network { network })
                .map_err(|e| format!("invalid network '{s}': {e}"));
        }

        if let Some(target) = parse_hostname(s) {
            return Ok(target);
        }

        Err(format!("invalid target: {s}"))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Address { addr } => write!(f, "{addr}"),
            Target::Hostname { name } => write!(f, "{name}"),
            Target::Network { network } => write!(f, "{}/{}", network.network(), network.prefix()),
        }
    }
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>()
        .ok()
        .map(|addr| Target::Address { addr })
}

/// Parses a DNS name. Dotted numbers are never names, "10.0.0.256" is a broken address.
fn parse_hostname(s: &str) -> Option<Target> {
    if s.len() > MAX_HOSTNAME_LEN {
        return None;
    }

    if s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    HOSTNAME_RE.is_match(s).then(|| Target::Hostname {
        name: s.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
