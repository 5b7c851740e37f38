use std::collections::BTreeSet;

use portaudit_common::network::target::Target;
use portaudit_core::{ScanError, ScanReport, Scanner};

use super::support::{fixed_scanner, open_port, options};

#[tokio::test]
async fn slash_thirty_yields_its_two_usable_hosts() {
    let result = fixed_scanner(&[22])
        .scan_network("192.168.50.0/30", &options(&[22, 443]))
        .await
        .unwrap();

    assert_eq!(result.network, "192.168.50.0/30");
    let hosts: Vec<&str> = result.hosts.iter().map(|h| h.host.as_str()).collect();
    assert_eq!(hosts, ["192.168.50.1", "192.168.50.2"]);
    assert_eq!(result.responsive_hosts().count(), 2);
}

#[tokio::test]
async fn every_address_of_a_slash_twenty_four_is_reported_once() {
    let result = fixed_scanner(&[])
        .scan_network("10.20.30.0/24", &options(&[80]))
        .await
        .unwrap();

    assert_eq!(result.len(), 254);
    let unique: BTreeSet<&str> = result.hosts.iter().map(|h| h.host.as_str()).collect();
    assert_eq!(unique.len(), 254);
    assert!(!unique.contains("10.20.30.0"));
    assert!(!unique.contains("10.20.30.255"));
    assert_eq!(result.responsive_hosts().count(), 0);
}

#[tokio::test]
async fn host_bits_are_masked_off() {
    let result = fixed_scanner(&[])
        .scan_network("10.0.0.77/30", &options(&[80]))
        .await
        .unwrap();

    assert_eq!(result.network, "10.0.0.76/30");
    assert_eq!(result.hosts[0].host, "10.0.0.77");
}

#[tokio::test]
async fn invalid_network_fails_the_whole_scan() {
    let err = fixed_scanner(&[22])
        .scan_network("10.0.0.0/99", &options(&[22]))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::InvalidNetwork(_)));
    assert!(err.to_string().starts_with("Invalid network format"));
}

#[tokio::test]
async fn real_loopback_network_scan() {
    let (_listener, open) = open_port().await;
    let target: Target = "127.0.0.0/30".parse().unwrap();

    let report = Scanner::new().scan_target(&target, &options(&[open])).await.unwrap();

    let ScanReport::Network(result) = report else {
        panic!("a CIDR target must produce a network result");
    };
    assert_eq!(result.len(), 2);
    assert_eq!(result.hosts[0].report().unwrap().open_ports, vec![open]);
    assert!(result.hosts[1].report().unwrap().open_ports.is_empty());
}

#[tokio::test]
async fn network_result_json_shape() {
    let report = ScanReport::Network(
        fixed_scanner(&[21])
            .scan_network("172.16.0.0/31", &options(&[21]))
            .await
            .unwrap(),
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["network"], "172.16.0.0/31");
    let hosts = json["hosts"].as_array().unwrap();
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0]["vulnerabilities"][0]["type"], "Insecure Protocol");
    assert_eq!(hosts[0]["security_analysis"]["risk_level"], "High");
}
