//! Local interface lookups used to suggest a default sweep range.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

/// First IPv4 address of an interface that is up and not a loopback.
pub fn local_ipv4() -> anyhow::Result<Ipv4Addr> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    select_ipv4(&interfaces).ok_or_else(|| anyhow::anyhow!("no valid IPv4 address found"))
}

pub fn select_ipv4(interfaces: &[NetworkInterface]) -> Option<Ipv4Addr> {
    interfaces
        .iter()
        .filter(|intf| intf.is_up() && !intf.is_loopback())
        .find_map(|intf| {
            intf.ips.iter().find_map(|net| match net {
                IpNetwork::V4(v4) if !v4.ip().is_loopback() => {
                    debug!("Using {} from interface {}", v4.ip(), intf.name);
                    Some(v4.ip())
                }
                _ => None,
            })
        })
}

/// The `.1` address of the /24 the given address lives in.
pub fn network_start(addr: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = addr.octets();
    Ipv4Addr::new(a, b, c, 1)
}

/// The `.254` address of the /24 the given address lives in.
pub fn network_end(addr: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = addr.octets();
    Ipv4Addr::new(a, b, c, 254)
}
