//! # Address Codec
//!
//! Converts between the dotted-quad form of an IPv4 address and its 32-bit
//! ordinal. Ordinals are packed big-endian, so incrementing one walks the
//! address space in the usual order (`x.x.1.255` is followed by `x.x.2.0`).

use std::net::{IpAddr, Ipv4Addr};

use crate::error::FormatError;

/// Parses a strict dotted quad: four decimal octets, nothing before or after.
pub fn parse(text: &str) -> Result<Ipv4Addr, FormatError> {
    match text.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(_)) => Err(FormatError::Ipv6Unsupported(text.to_string())),
        Err(_) => Err(FormatError::InvalidAddress(text.to_string())),
    }
}

pub fn to_ordinal(addr: Ipv4Addr) -> u32 {
    u32::from_be_bytes(addr.octets())
}

pub fn to_address(ordinal: u32) -> Ipv4Addr {
    Ipv4Addr::from(ordinal.to_be_bytes())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
