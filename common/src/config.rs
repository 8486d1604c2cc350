use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_CONCURRENCY: usize = 256;
/// Widest range accepted without `allow_large` (a /16).
pub const DEFAULT_MAX_RANGE_WIDTH: u64 = 1 << 16;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bounds how long a single probe or reverse lookup may wait.
    pub timeout: Duration,
    /// Number of address workers running at the same time.
    pub concurrency: usize,
    /// Overall limit for one sweep. The sweep is cancelled once it elapses.
    pub budget: Option<Duration>,
    /// Extra probe attempts for addresses that did not answer.
    pub retries: u8,
    /// Disables reverse lookups entirely.
    pub no_dns: bool,
    /// Nameserver used for PTR queries; discovered from the system when unset.
    pub dns_server: Option<SocketAddr>,
    /// Lifts the range width ceiling.
    pub allow_large: bool,
    /// Also report addresses that did not answer.
    pub show_unreachable: bool,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            budget: None,
            retries: 0,
            no_dns: false,
            dns_server: None,
            allow_large: false,
            show_unreachable: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.budget.is_some_and(|budget| budget.is_zero()) {
            return Err(ConfigError::ZeroBudget);
        }
        Ok(())
    }

    /// The range width ceiling in effect, `None` when lifted.
    pub fn max_range_width(&self) -> Option<u64> {
        (!self.allow_large).then_some(DEFAULT_MAX_RANGE_WIDTH)
    }
}
