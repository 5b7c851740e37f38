use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use portaudit_common::ports::PortSet;
use portaudit_core::network::resolver::SystemResolver;
use portaudit_core::network::tcp::{PortOutcome, PortProber};
use portaudit_core::{ScanOptions, Scanner};
use tokio::net::TcpListener;

pub const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// A listener on an ephemeral loopback port, open for as long as it lives.
pub async fn open_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port that was just released, nothing listens on it anymore.
pub async fn closed_port() -> u16 {
    let (listener, port) = open_port().await;
    drop(listener);
    port
}

pub fn options(ports: &[u16]) -> ScanOptions {
    ScanOptions {
        ports: PortSet::new(ports.iter().copied()),
        timeout: Duration::from_millis(500),
        ..ScanOptions::default()
    }
}

/// Claims a fixed set of ports open on every address.
pub struct FixedProber(pub Vec<u16>);

#[async_trait]
impl PortProber for FixedProber {
    async fn probe(&self, addr: SocketAddr, _timeout: Duration) -> PortOutcome {
        if self.0.contains(&addr.port()) {
            PortOutcome::Open
        } else {
            PortOutcome::Closed
        }
    }
}

pub fn fixed_scanner(open: &[u16]) -> Scanner {
    Scanner::with_backends(Arc::new(FixedProber(open.to_vec())), Arc::new(SystemResolver))
}
