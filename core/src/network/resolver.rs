use std::io::{self, ErrorKind};
use std::net::IpAddr;

use async_trait::async_trait;
use tokio::net::lookup_host;

/// Turns a hostname into the address that will be probed.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> io::Result<IpAddr>;
}

/// Resolves names through the operating system (`getaddrinfo`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> io::Result<IpAddr> {
        let addrs: Vec<IpAddr> = lookup_host((host, 0)).await?.map(|a| a.ip()).collect();
        pick_address(&addrs).ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, format!("no addresses found for {host}"))
        })
    }
}

/// Resolves `target`, skipping the lookup when it already is a literal address.
pub async fn resolve_target(resolver: &dyn HostResolver, target: &str) -> io::Result<IpAddr> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }
    resolver.resolve(target).await
}

// IPv4 first, the way gethostbyname answers
fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    struct FailingResolver;

    #[async_trait]
    impl HostResolver for FailingResolver {
        async fn resolve(&self, host: &str) -> io::Result<IpAddr> {
            Err(io::Error::new(ErrorKind::NotFound, host.to_string()))
        }
    }

    #[test]
    fn pick_address_prefers_ipv4() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let v4 = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert_eq!(pick_address(&[v6, v4]), Some(v4));
        assert_eq!(pick_address(&[v6]), Some(v6));
        assert_eq!(pick_address(&[]), None);
    }

    #[tokio::test]
    async fn literal_addresses_bypass_the_resolver() {
        let ip = resolve_target(&FailingResolver, "10.0.0.7").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));
    }

    #[tokio::test]
    async fn resolver_errors_are_returned() {
        assert!(resolve_target(&FailingResolver, "example.com").await.is_err());
    }

    #[tokio::test]
    async fn system_resolver_rejects_reserved_tld() {
        assert!(SystemResolver.resolve("nonexistent.invalid").await.is_err());
    }
}
