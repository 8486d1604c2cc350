use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sweepr_protocols::dns::{self, DNS_PORT, PtrAnswer};
use tokio::net::UdpSocket;
use tracing::{debug, trace};

/// Printed in place of a name when reverse resolution yields nothing.
pub const UNKNOWN_NAME: &str = "Unknown";

const RESOLV_CONF: &str = "/etc/resolv.conf";
const FALLBACK_NAMESERVER: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);
const MAX_DATAGRAM: usize = 1_232;

/// Reverse-name lookup capability. Returns every candidate name, possibly none.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub address: Ipv4Addr,
    pub name: Option<String>,
}

/// Resolves `addr`, collapsing lookup errors and timeouts into an absent name.
pub async fn resolve(resolver: &dyn NameResolver, addr: Ipv4Addr, timeout: Duration) -> ResolutionResult {
    let name = match tokio::time::timeout(timeout, resolver.lookup(addr)).await {
        Ok(Ok(candidates)) => first_candidate(candidates),
        Ok(Err(e)) => {
            debug!("{addr}: reverse lookup failed: {e:#}");
            None
        }
        Err(_) => {
            debug!("{addr}: reverse lookup timed out");
            None
        }
    };
    ResolutionResult { address: addr, name }
}

/// First candidate with the trailing root separator removed.
pub fn first_candidate(candidates: Vec<String>) -> Option<String> {
    let first = candidates.into_iter().next()?;
    let name = first.strip_suffix('.').unwrap_or(&first);
    (!name.is_empty()).then(|| name.to_string())
}

/// Sends PTR queries over UDP to a single nameserver.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    server: SocketAddr,
}

impl DnsResolver {
    pub fn new(server: SocketAddr) -> Self {
        Self { server }
    }

    /// Uses the first IPv4 nameserver from the system configuration.
    pub fn from_system() -> Self {
        Self::new(system_nameserver())
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }
}

#[async_trait]
impl NameResolver for DnsResolver {
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>> {
        let bind_addr: SocketAddr = match self.server {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (std::net::Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr).await.context("binding DNS socket")?;
        socket
            .connect(self.server)
            .await
            .with_context(|| format!("connecting to nameserver {}", self.server))?;

        let id: u16 = rand::random();
        let query: Vec<u8> = dns::create_ptr_packet(addr, id)?;
        socket.send(&query).await.context("sending PTR query")?;

        let mut buffer = vec![0u8; MAX_DATAGRAM];
        loop {
            let len = socket.recv(&mut buffer).await.context("receiving PTR answer")?;
            match dns::parse_ptr_response(&buffer[..len]) {
                Ok(PtrAnswer { id: answer_id, names }) if answer_id == id => return Ok(names),
                Ok(PtrAnswer { id: answer_id, .. }) => {
                    trace!("{addr}: ignoring DNS answer with foreign id {answer_id}");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Used when name resolution is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

#[async_trait]
impl NameResolver for NoResolver {
    async fn lookup(&self, _addr: Ipv4Addr) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

pub fn system_nameserver() -> SocketAddr {
    let configured = std::fs::read_to_string(RESOLV_CONF)
        .ok()
        .and_then(|contents| parse_resolv_conf(&contents));

    let ip = configured.unwrap_or_else(|| {
        debug!("No IPv4 nameserver in {RESOLV_CONF}, using {FALLBACK_NAMESERVER}");
        FALLBACK_NAMESERVER
    });
    SocketAddr::new(IpAddr::V4(ip), DNS_PORT)
}

fn parse_resolv_conf(contents: &str) -> Option<Ipv4Addr> {
    contents.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some("nameserver"), Some(server)) => server.parse::<Ipv4Addr>().ok(),
            _ => None,
        }
    })
}
