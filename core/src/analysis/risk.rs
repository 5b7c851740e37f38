//! Coarse security scoring of a host's exposure.
//!
//! The policy is fixed: the same open-port set always yields the same level,
//! score and recommendations, in this order of checks:
//!
//! 1. high-risk services (FTP, Telnet, RDP): level High, -30
//! 2. unencrypted services (FTP, Telnet, HTTP): at least Medium, -20
//! 3. more than five open ports: -10
//!
//! A host that trips none of them only gets the generic audit advice.

use std::fmt;

use serde::Serialize;

const BASE_SCORE: i32 = 100;

const HIGH_RISK_PORTS: [u16; 3] = [21, 23, 3389];
const UNENCRYPTED_PORTS: [u16; 3] = [21, 23, 80];
const MAX_OPEN_PORTS: usize = 5;

const HIGH_RISK_PENALTY: i32 = 30;
const UNENCRYPTED_PENALTY: i32 = 20;
const OPEN_PORTS_PENALTY: i32 = 10;

pub const SECURE_HIGH_RISK: &str = "Disable or secure high-risk services";
pub const USE_ENCRYPTION: &str = "Use encrypted alternatives (HTTPS, SFTP, SSH)";
pub const CLOSE_PORTS: &str = "Close unnecessary ports";
pub const REGULAR_AUDITS: &str = "Regular security audits recommended";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAnalysis {
    pub risk_level: RiskLevel,
    pub score: i32,
    pub recommendations: Vec<String>,
}

impl RiskAnalysis {
    fn baseline() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            score: BASE_SCORE,
            recommendations: Vec::new(),
        }
    }

    // Levels only ever go up.
    fn deduct(&mut self, level: RiskLevel, penalty: i32, advice: &str) {
        self.risk_level = self.risk_level.max(level);
        self.score -= penalty;
        self.recommendations.push(advice.to_string());
    }
}

pub fn analyze(open_ports: &[u16]) -> RiskAnalysis {
    let mut analysis = RiskAnalysis::baseline();

    if exposes_any(open_ports, &HIGH_RISK_PORTS) {
        analysis.deduct(RiskLevel::High, HIGH_RISK_PENALTY, SECURE_HIGH_RISK);
    }

    if exposes_any(open_ports, &UNENCRYPTED_PORTS) {
        analysis.deduct(RiskLevel::Medium, UNENCRYPTED_PENALTY, USE_ENCRYPTION);
    }

    if open_ports.len() > MAX_OPEN_PORTS {
        analysis.deduct(RiskLevel::Low, OPEN_PORTS_PENALTY, CLOSE_PORTS);
    }

    if analysis.recommendations.is_empty() {
        analysis.recommendations.push(REGULAR_AUDITS.to_string());
    }

    analysis
}

fn exposes_any(open_ports: &[u16], watched: &[u16]) -> bool {
    open_ports.iter().any(|port| watched.contains(port))
}
