use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::Ipv4Network;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("expected ADDRESS/PREFIX, got '{0}'")]
    MissingPrefix(String),
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    #[error("invalid prefix '{0}'")]
    InvalidPrefix(String),
    #[error("IPv6 ranges are not supported: '{0}'")]
    Ipv6(String),
}

/// An inclusive span of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }

    pub fn len(&self) -> u64 {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            return 0;
        }
        u64::from(end - start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses CIDR notation like "192.168.1.0/24".
///
/// Host bits are allowed and masked off, so "192.168.1.77/24" yields
/// the same network as "192.168.1.0/24".
pub fn parse_cidr(s: &str) -> Result<Ipv4Network, RangeError> {
    let Some((ip_str, prefix_str)) = s.trim().split_once('/') else {
        return Err(RangeError::MissingPrefix(s.to_string()));
    };

    let ip = ip_str
        .parse::<IpAddr>()
        .map_err(|_| RangeError::InvalidAddress(ip_str.to_string()))?;

    let IpAddr::V4(ipv4_addr) = ip else {
        return Err(RangeError::Ipv6(s.to_string()));
    };

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|_| RangeError::InvalidPrefix(prefix_str.to_string()))?;

    let network = Ipv4Network::new(ipv4_addr, prefix)
        .map_err(|_| RangeError::InvalidPrefix(prefix_str.to_string()))?;

    Ipv4Network::new(network.network(), prefix)
        .map_err(|_| RangeError::InvalidPrefix(prefix_str.to_string()))
}

/// Calculates the usable host range of a network.
///
/// Network and broadcast addresses are stripped, except for /31 point-to-point
/// links (both addresses usable) and /32 single hosts.
pub fn usable_hosts(network: &Ipv4Network) -> Ipv4Range {
    let net_u32: u32 = u32::from(network.network());
    let broadcast_u32: u32 = u32::from(network.broadcast());

    match network.prefix() {
        32 => Ipv4Range::new(network.ip(), network.ip()),
        31 => {
            debug!("{network} is a point-to-point link, keeping both addresses");
            Ipv4Range::new(network.network(), network.broadcast())
        }
        _ => Ipv4Range::new(
            Ipv4Addr::from(net_u32.saturating_add(1)),
            Ipv4Addr::from(broadcast_u32.saturating_sub(1)),
        ),
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
