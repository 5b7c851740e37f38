use portaudit_common::network::target::Target;
use portaudit_core::{ScanReport, Scanner};

use super::support::{LOOPBACK, closed_port, open_port, options};

#[tokio::test]
async fn loopback_scan_separates_open_and_closed() {
    let (_listener, open) = open_port().await;
    let closed = closed_port().await;

    let result = Scanner::new()
        .scan_host("127.0.0.1", &options(&[closed, open]))
        .await;

    let report = result.report().expect("loopback always resolves");
    assert_eq!(report.ip, LOOPBACK);
    assert_eq!(report.open_ports, vec![open]);
    assert_eq!(report.closed_ports, vec![closed]);
    assert_eq!(report.services.len(), 1);
}

#[tokio::test]
async fn nothing_open_is_low_risk() {
    let closed = closed_port().await;

    let result = Scanner::new().scan_host("127.0.0.1", &options(&[closed])).await;
    let report = result.report().unwrap();

    assert!(report.open_ports.is_empty());
    assert!(report.vulnerabilities.is_empty());
    assert_eq!(report.security_analysis.score, 100);
    assert_eq!(report.security_analysis.risk_level.to_string(), "Low");
}

#[tokio::test]
async fn unresolvable_host_is_reported_not_raised() {
    let result = Scanner::new()
        .scan_host("nonexistent.invalid", &options(&[80]))
        .await;

    assert_eq!(result.host, "nonexistent.invalid");
    assert_eq!(result.error(), Some("Host resolution failed"));
    assert!(result.report().is_none());
}

#[tokio::test]
async fn parsed_address_target_runs_a_host_scan() {
    let (_listener, open) = open_port().await;
    let target: Target = "127.0.0.1".parse().unwrap();

    let report = Scanner::new().scan_target(&target, &options(&[open])).await.unwrap();

    let ScanReport::Host(result) = report else {
        panic!("an address target must produce a host result");
    };
    assert_eq!(result.ip(), Some(LOOPBACK));
}

#[tokio::test]
async fn host_result_json_shape() {
    let (_listener, open) = open_port().await;

    let result = Scanner::new().scan_host("127.0.0.1", &options(&[open])).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["host"], "127.0.0.1");
    assert_eq!(json["ip"], "127.0.0.1");
    assert!(json["timestamp"].is_string());
    assert_eq!(json["open_ports"], serde_json::json!([open]));
    assert_eq!(json["closed_ports"], serde_json::json!([]));
    assert!(json["vulnerabilities"].is_array());
    assert!(json["security_analysis"]["score"].is_i64());
    assert!(json.get("error").is_none());
}
