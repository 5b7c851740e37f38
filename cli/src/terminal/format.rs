use std::net::IpAddr;

use crate::terminal::colors;
use colored::*;
use portaudit_core::analysis::risk::RiskLevel;
use portaudit_core::analysis::vulns::{Finding, Severity};
use portaudit_core::{HostResult, PortReport};

pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => colors::RISK_LOW,
        RiskLevel::Medium => colors::RISK_MEDIUM,
        RiskLevel::High => colors::RISK_HIGH,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Medium => colors::RISK_MEDIUM,
        Severity::High => colors::RISK_HIGH,
    }
}

pub fn ip_to_key_value_pair(ip: &IpAddr) -> (String, ColoredString) {
    match ip {
        IpAddr::V4(ipv4_addr) => (
            String::from("IPv4"),
            ipv4_addr.to_string().color(colors::IPV4_ADDR),
        ),
        IpAddr::V6(ipv6_addr) => (
            String::from("IPv6"),
            ipv6_addr.to_string().color(colors::IPV6_ADDR),
        ),
    }
}

/// Key/value lines of a host tree. Failed hosts only carry their error.
pub fn host_details(result: &HostResult) -> Vec<(String, ColoredString)> {
    let time = result.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

    let Some(report) = result.report() else {
        return vec![
            (String::from("Time"), time.normal()),
            (
                String::from("Error"),
                result.error().unwrap_or_default().red().bold(),
            ),
        ];
    };

    let analysis = &report.security_analysis;
    vec![
        ip_to_key_value_pair(&report.ip),
        (String::from("Time"), time.normal()),
        (
            String::from("Open"),
            port_count(report.open_ports.len(), report.closed_ports.len()),
        ),
        (
            String::from("Risk"),
            analysis
                .risk_level
                .to_string()
                .color(risk_color(analysis.risk_level))
                .bold(),
        ),
        (
            String::from("Score"),
            format!("{}/100", analysis.score).color(risk_color(analysis.risk_level)),
        ),
    ]
}

fn port_count(open: usize, closed: usize) -> ColoredString {
    let noun = if open == 1 { "port" } else { "ports" };
    format!("{open} {noun} of {}", open + closed).normal()
}

/// One line per open port, such as `22/tcp  SSH`.
pub fn open_port_lines(report: &PortReport) -> Vec<String> {
    report
        .open_ports
        .iter()
        .map(|port| {
            let service = report.services.get(port).map(String::as_str).unwrap_or_default();
            format!(
                "{:<9} {}",
                format!("{port}/tcp").color(colors::PORT),
                service
            )
        })
        .collect()
}

pub fn finding_line(finding: &Finding) -> String {
    let mut line = format!(
        "{} {} on {}: {}",
        format!("[{}]", finding.severity).color(severity_color(finding.severity)).bold(),
        finding.kind,
        finding.port.to_string().color(colors::PORT),
        finding.description
    );
    if let Some(advice) = finding.recommendation {
        line.push_str(&format!(" {}", format!("({advice})").dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use portaudit_core::analysis::{risk, vulns};
    use std::collections::BTreeMap;
    use std::net::Ipv4Addr;

    fn report(open: &[u16]) -> PortReport {
        PortReport {
            ip: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            open_ports: open.to_vec(),
            closed_ports: vec![443],
            services: open.iter().map(|&p| (p, String::from("FTP"))).collect::<BTreeMap<_, _>>(),
            vulnerabilities: open.iter().flat_map(|&p| vulns::findings(p, "FTP")).collect(),
            security_analysis: risk::analyze(open),
        }
    }

    fn keys(details: &[(String, ColoredString)]) -> Vec<&str> {
        details.iter().map(|(key, _)| key.as_str()).collect()
    }

    #[test]
    fn scanned_host_lists_address_and_risk() {
        let result = HostResult::scanned("ftp.local", Local::now(), report(&[21]));
        let details = host_details(&result);

        assert_eq!(keys(&details), vec!["IPv4", "Time", "Open", "Risk", "Score"]);
        assert_eq!(details[0].1.to_string(), "10.0.0.1".color(colors::IPV4_ADDR).to_string());
        assert!(details[2].1.to_string().contains("1 port of 2"));
        assert!(details[4].1.to_string().contains("50/100"));
    }

    #[test]
    fn failed_host_shows_only_its_error() {
        let result = HostResult::failed("nowhere.invalid", Local::now(), "Host resolution failed");
        let details = host_details(&result);

        assert_eq!(keys(&details), vec!["Time", "Error"]);
        assert!(details[1].1.to_string().contains("Host resolution failed"));
    }

    #[test]
    fn open_ports_are_listed_with_services() {
        let lines = open_port_lines(&report(&[21]));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("21/tcp"));
        assert!(lines[0].ends_with("FTP"));
    }

    #[test]
    fn finding_line_mentions_recommendation() {
        let finding = &vulns::findings(21, "FTP")[0];
        let line = finding_line(finding);
        assert!(line.contains(finding.kind));
        if let Some(advice) = finding.recommendation {
            assert!(line.contains(advice));
        }
    }

    #[test]
    fn risk_levels_have_distinct_colors() {
        assert_ne!(risk_color(RiskLevel::Low), risk_color(RiskLevel::High));
        assert_ne!(risk_color(RiskLevel::Medium), risk_color(RiskLevel::High));
    }
}
