//! Ordered sets of TCP ports to probe.

use std::fmt;
use std::str::FromStr;

/// Ports probed when the caller does not ask for anything specific.
pub const DEFAULT_PORTS: [u16; 14] = [
    21, 22, 23, 25, 53, 80, 110, 143, 443, 993, 995, 3389, 5432, 3306,
];

/// An ordered sequence of distinct ports.
///
/// The order only decides in which sequence probes are issued; duplicates are
/// dropped on construction and the first occurrence keeps its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet {
    ports: Vec<u16>,
}

impl PortSet {
    pub fn new(ports: impl IntoIterator<Item = u16>) -> Self {
        let mut unique: Vec<u16> = Vec::new();
        for port in ports {
            if !unique.contains(&port) {
                unique.push(port);
            }
        }
        Self { ports: unique }
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Default for PortSet {
    fn default() -> Self {
        Self::new(DEFAULT_PORTS)
    }
}

impl From<Vec<u16>> for PortSet {
    fn from(ports: Vec<u16>) -> Self {
        Self::new(ports)
    }
}

impl FromStr for PortSet {
    type Err = String;

    /// Parses a comma-separated list such as "80,443,8080".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ports = s
            .split(',')
            .map(str::trim)
            .map(|part| {
                if part.is_empty() {
                    return Err(format!("empty port entry in '{s}'"));
                }
                part.parse::<u16>()
                    .map_err(|_| format!("invalid port '{part}', expected a number from 0 to 65535"))
            })
            .collect::<Result<Vec<u16>, String>>()?;

        Ok(Self::new(ports))
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.ports.iter().map(u16::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}
