use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_core::scanner::prober::EchoProber;
use sweepr_core::scanner::resolver::NameResolver;

/// Answers for a fixed set of addresses and counts every probe.
#[derive(Default)]
pub struct StaticProber {
    up: HashSet<Ipv4Addr>,
    calls: AtomicUsize,
}

impl StaticProber {
    pub fn up(addrs: &[Ipv4Addr]) -> Self {
        Self {
            up: addrs.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EchoProber for StaticProber {
    async fn probe(&self, addr: Ipv4Addr, _timeout: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.up.contains(&addr)
    }
}

/// Answers "down" for the first `limit` probes and never returns after that.
pub struct StallingProber {
    limit: usize,
    calls: AtomicUsize,
}

impl StallingProber {
    pub fn after(limit: usize) -> Self {
        Self {
            limit,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EchoProber for StallingProber {
    async fn probe(&self, _addr: Ipv4Addr, _timeout: Duration) -> bool {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.limit {
            return false;
        }
        std::future::pending().await
    }
}

/// Returns the configured PTR candidates, nothing for unknown addresses.
#[derive(Default)]
pub struct StaticResolver {
    names: HashMap<Ipv4Addr, Vec<String>>,
    lookups: AtomicUsize,
}

impl StaticResolver {
    pub fn with(mut self, addr: Ipv4Addr, names: &[&str]) -> Self {
        self.names
            .insert(addr, names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for StaticResolver {
    async fn lookup(&self, addr: Ipv4Addr) -> anyhow::Result<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.names.get(&addr).cloned().unwrap_or_default())
    }
}
