use std::net::Ipv4Addr;

use thiserror::Error;

/// Rejections of the requested address range. Raised before any probe is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("`{0}` is not a valid IPv4 address")]
    InvalidAddress(String),
    #[error("`{0}` is an IPv6 address, only IPv4 is supported")]
    Ipv6Unsupported(String),
    #[error("start address {start} is greater than end address {end}")]
    StartAfterEnd { start: Ipv4Addr, end: Ipv4Addr },
    #[error("range spans {width} addresses, more than the limit of {limit} (use --allow-large)")]
    RangeTooWide { width: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,
    #[error("sweep budget must be greater than zero")]
    ZeroBudget,
}

/// Everything that stops a sweep from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
