//! # IPv4 Range Model
//!
//! A closed interval `[start, end]` over IPv4 address space. Construction
//! enforces `start <= end`, so every `Ipv4Range` in circulation is non-empty.

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::FormatError;
use crate::network::codec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    start_addr: Ipv4Addr,
    end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Result<Self, FormatError> {
        if start_addr > end_addr {
            return Err(FormatError::StartAfterEnd {
                start: start_addr,
                end: end_addr,
            });
        }
        Ok(Self {
            start_addr,
            end_addr,
        })
    }

    /// Parses both endpoints and validates their order.
    pub fn parse(start: &str, end: &str) -> Result<Self, FormatError> {
        Self::new(codec::parse(start)?, codec::parse(end)?)
    }

    pub fn from_ordinals(start: u32, end: u32) -> Result<Self, FormatError> {
        Self::new(codec::to_address(start), codec::to_address(end))
    }

    pub fn single(addr: Ipv4Addr) -> Self {
        Self {
            start_addr: addr,
            end_addr: addr,
        }
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start_addr
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end_addr
    }

    /// Number of addresses in the range. A full sweep of the space is 2^32,
    /// hence `u64`.
    pub fn width(&self) -> u64 {
        u64::from(codec::to_ordinal(self.end_addr)) - u64::from(codec::to_ordinal(self.start_addr)) + 1
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.start_addr <= addr && addr <= self.end_addr
    }

    /// Rejects the range when it is wider than `limit`.
    pub fn check_width(&self, limit: Option<u64>) -> Result<(), FormatError> {
        match limit {
            Some(limit) if self.width() > limit => Err(FormatError::RangeTooWide {
                width: self.width(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone {
        let start: u32 = codec::to_ordinal(self.start_addr);
        let end: u32 = codec::to_ordinal(self.end_addr);
        (start..=end).map(codec::to_address)
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_addr == self.end_addr {
            write!(f, "{}", self.start_addr)
        } else {
            write!(f, "{}-{}", self.start_addr, self.end_addr)
        }
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
