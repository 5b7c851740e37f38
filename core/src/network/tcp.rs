use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

/// The classification of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOutcome {
    /// The handshake completed within the timeout.
    Open,
    /// The peer refused the connection or never answered in time.
    Closed,
    /// Any other socket failure. Reported together with closed ports.
    Error(ErrorKind),
}

impl PortOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, PortOutcome::Open)
    }
}

/// Defines the strategy for probing transport-layer ports to identify active services.
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> PortOutcome;
}

/// Plain TCP connect probing, one socket per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnectProber;

#[async_trait]
impl PortProber for TcpConnectProber {
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> PortOutcome {
        probe(addr, timeout).await
    }
}

/// Attempts one TCP connection to `addr`.
///
/// The stream (or the pending connect future on timeout) is dropped before
/// returning, so the socket is released on every path.
pub async fn probe(addr: SocketAddr, probe_timeout: Duration) -> PortOutcome {
    classify_attempt(timeout(probe_timeout, TcpStream::connect(addr)).await)
}

fn classify_attempt<T>(attempt: Result<io::Result<T>, Elapsed>) -> PortOutcome {
    match attempt {
        Ok(Ok(_stream)) => PortOutcome::Open,
        Ok(Err(e)) => classify_error(&e),
        Err(_elapsed) => PortOutcome::Closed,
    }
}

fn classify_error(e: &io::Error) -> PortOutcome {
    match e.kind() {
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset | ErrorKind::TimedOut => {
            PortOutcome::Closed
        }
        kind => PortOutcome::Error(kind),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::TcpListener;

    const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn probe_reports_listening_port_as_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        assert_eq!(probe(addr, PROBE_TIMEOUT).await, PortOutcome::Open);
    }

    #[tokio::test]
    async fn probe_reports_refused_port_as_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = probe(addr, PROBE_TIMEOUT).await;
        assert_eq!(outcome, PortOutcome::Closed);
        assert!(!outcome.is_open());
    }

    #[tokio::test]
    async fn prober_trait_delegates_to_probe() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let prober: &dyn PortProber = &TcpConnectProber;
        assert!(prober.probe(addr, PROBE_TIMEOUT).await.is_open());
    }

    #[test]
    fn unexpected_socket_errors_are_kept_apart() {
        let refused = io::Error::from(ErrorKind::ConnectionRefused);
        assert_eq!(classify_error(&refused), PortOutcome::Closed);

        let denied = io::Error::from(ErrorKind::PermissionDenied);
        assert_eq!(
            classify_error(&denied),
            PortOutcome::Error(ErrorKind::PermissionDenied)
        );
        assert!(!classify_error(&denied).is_open());
    }

    #[tokio::test]
    async fn elapsed_connect_is_closed() {
        let attempt = timeout(Duration::ZERO, std::future::pending::<io::Result<()>>()).await;
        assert!(attempt.is_err());
        assert_eq!(classify_attempt(attempt), PortOutcome::Closed);
    }

    #[test]
    fn finished_attempts_are_classified_by_result() {
        let connected: Result<io::Result<()>, Elapsed> = Ok(Ok(()));
        assert_eq!(classify_attempt(connected), PortOutcome::Open);

        let reset: Result<io::Result<()>, Elapsed> = Ok(Err(ErrorKind::ConnectionReset.into()));
        assert_eq!(classify_attempt(reset), PortOutcome::Closed);
    }

    #[tokio::test]
    #[ignore]
    async fn probe_should_find_known_open_port() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 443);
        assert!(probe(addr, PROBE_TIMEOUT).await.is_open());
    }

    #[tokio::test]
    #[ignore]
    async fn probe_should_give_up_on_unreachable_ip() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1)), 443);
        assert!(!probe(addr, Duration::from_millis(100)).await.is_open());
    }
}
