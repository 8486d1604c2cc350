pub mod sweep;

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{ArgAction, Parser};
use sweepr_common::config::{Config, DEFAULT_CONCURRENCY};
use sweepr_protocols::dns::DNS_PORT;

#[derive(Parser)]
#[command(name = "sweepr", version)]
#[command(about = "Finds live hosts in an IPv4 range and looks up their names.")]
pub struct CommandLine {
    /// First address of the range [default: the .1 address of this machine's network]
    pub start: Option<String>,
    /// Last address of the range
    pub end: Option<String>,
    /// How long a single probe or name lookup may take, in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = 1_000)]
    pub timeout: u64,
    /// Maximum number of addresses being worked on at once
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
    /// Stop the sweep after this many seconds
    #[arg(short, long, value_name = "SECS")]
    pub budget: Option<u64>,
    /// Extra probe attempts for hosts that did not answer
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub retries: u8,
    /// Also list addresses that did not answer
    #[arg(short, long)]
    pub all: bool,
    /// Skip reverse name lookups
    #[arg(long)]
    pub no_dns: bool,
    /// Nameserver for reverse lookups, as IP or IP:PORT
    #[arg(long, value_name = "ADDR", value_parser = parse_dns_server)]
    pub dns_server: Option<SocketAddr>,
    /// Accept ranges wider than 65536 addresses
    #[arg(long)]
    pub allow_large: bool,
    /// Print result lines only
    #[arg(short, long)]
    pub quiet: bool,
    /// Increase log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            timeout: Duration::from_millis(self.timeout),
            concurrency: self.concurrency,
            budget: self.budget.map(Duration::from_secs),
            retries: self.retries,
            no_dns: self.no_dns,
            dns_server: self.dns_server,
            allow_large: self.allow_large,
            show_unreachable: self.all,
            quiet: self.quiet,
        }
    }
}

fn parse_dns_server(s: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    s.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| format!("invalid nameserver address: {s}"))
}
