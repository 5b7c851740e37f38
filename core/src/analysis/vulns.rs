use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// A protocol-level weakness observed on an open port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub port: u16,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
}

struct Rule {
    port: u16,
    kind: &'static str,
    severity: Severity,
    description: &'static str,
    recommendation: Option<&'static str>,
}

impl Rule {
    fn to_finding(&self) -> Finding {
        Finding {
            port: self.port,
            kind: self.kind,
            severity: self.severity,
            description: self.description,
            recommendation: self.recommendation,
        }
    }
}

const RULES: &[Rule] = &[
    Rule {
        port: 21,
        kind: "Insecure Protocol",
        severity: Severity::Medium,
        description: "FTP transmits data in plaintext",
        recommendation: Some("Use SFTP or FTPS instead"),
    },
    Rule {
        port: 23,
        kind: "Insecure Protocol",
        severity: Severity::High,
        description: "Telnet transmits credentials in plaintext",
        recommendation: Some("Use SSH instead of Telnet"),
    },
    Rule {
        port: 80,
        kind: "Unencrypted Web Traffic",
        severity: Severity::Medium,
        description: "HTTP traffic is not encrypted",
        recommendation: Some("Use HTTPS with valid SSL/TLS certificate"),
    },
    Rule {
        port: 3389,
        kind: "Remote Access",
        severity: Severity::High,
        description: "RDP exposed to network - potential brute force target",
        recommendation: Some("Use VPN or restrict RDP access to specific IPs"),
    },
];

/// Returns every finding that applies to an open `port`.
///
/// Rules are keyed by port only; `service` is informational for now.
pub fn findings(port: u16, _service: &str) -> Vec<Finding> {
    RULES
        .iter()
        .filter(|rule| rule.port == port)
        .map(Rule::to_finding)
        .collect()
}
