//! Echo probes.
//!
//! The default prober shells out to the platform `ping` utility, so a sweep
//! needs no privileges beyond what `ping` itself has.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Sends a single echo request and reports whether a reply arrived in time.
///
/// Every failure (timeout, host down, missing permissions, transport error)
/// is reported as `false`.
#[async_trait]
pub trait EchoProber: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub address: Ipv4Addr,
    pub reachable: bool,
    pub probed_at: SystemTime,
}

impl ProbeResult {
    pub fn new(address: Ipv4Addr, reachable: bool) -> Self {
        Self {
            address,
            reachable,
            probed_at: SystemTime::now(),
        }
    }
}

/// Runs `ping` for exactly one echo request.
#[derive(Debug, Clone)]
pub struct SystemPing {
    program: String,
}

impl Default for SystemPing {
    fn default() -> Self {
        Self::with_program("ping")
    }
}

impl SystemPing {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl EchoProber for SystemPing {
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> bool {
        let mut command = Command::new(&self.program);
        command
            .args(ping_args(addr, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!("{addr}: could not run {}: {e}", self.program);
                return false;
            }
        };

        // The deadline starts once the utility runs; a late reply does not count.
        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!("{addr}: waiting on {} failed: {e}", self.program);
                false
            }
            Err(_) => {
                debug!("{addr}: {} did not exit within {timeout:?}", self.program);
                false
            }
        }
    }
}

#[cfg(target_os = "windows")]
fn ping_args(addr: Ipv4Addr, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);
    vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), addr.to_string()]
}

#[cfg(target_os = "macos")]
fn ping_args(addr: Ipv4Addr, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);
    vec!["-c".into(), "1".into(), "-W".into(), millis.to_string(), addr.to_string()]
}

// iputils and busybox only take whole seconds for -W; the caller's deadline
// enforces the exact timeout.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn ping_args(addr: Ipv4Addr, timeout: Duration) -> Vec<String> {
    let secs = timeout.as_millis().div_ceil(1_000).max(1);
    vec!["-c".into(), "1".into(), "-W".into(), secs.to_string(), addr.to_string()]
}
