use std::net::Ipv4Addr;

use anyhow::{Context, bail};
use console::Term;
use sweepr_common::network::interface;
use tracing::{info, warn};

const START_PROMPT: &str = "Enter the starting IP address (or press Enter to use default): ";
const END_EXAMPLE: &str = "x.y.z.254";

/// Fills in whichever endpoints were not given on the command line.
///
/// A missing start falls back to the `.1` address of this machine's network.
/// Asking needs an attended terminal; otherwise a missing endpoint is an error.
pub fn endpoints(start: Option<String>, end: Option<String>) -> anyhow::Result<(String, String)> {
    if let (Some(start), Some(end)) = (&start, &end) {
        return Ok((start.clone(), end.clone()));
    }

    if !console::user_attended_stderr() {
        bail!("no terminal to ask for the range on; pass START and END as arguments");
    }
    let term = Term::stderr();
    let local = local_address();

    let start = match start {
        Some(start) => start,
        None => {
            let default_start = local.map(interface::network_start);
            if let Some(addr) = default_start {
                info!("Default starting IP address: {addr}");
            }
            let answer = ask(&term, START_PROMPT)?;
            match (answer.is_empty(), default_start) {
                (false, _) => answer,
                (true, Some(addr)) => addr.to_string(),
                (true, None) => bail!("no starting address given and no default available"),
            }
        }
    };

    let end = match end {
        Some(end) => end,
        None => ask(&term, &end_prompt(local))?,
    };

    Ok((start, end))
}

fn local_address() -> Option<Ipv4Addr> {
    match interface::local_ipv4() {
        Ok(addr) => {
            info!("Your IP address: {addr}");
            Some(addr)
        }
        Err(e) => {
            warn!("Could not determine this machine's address: {e}");
            None
        }
    }
}

/// Suggests the `.254` address of the local network as an example end.
fn end_prompt(local: Option<Ipv4Addr>) -> String {
    let example = local
        .map(|addr| interface::network_end(addr).to_string())
        .unwrap_or_else(|| END_EXAMPLE.to_string());
    format!("Enter the ending IP address (e.g., {example}): ")
}

fn ask(term: &Term, prompt: &str) -> anyhow::Result<String> {
    term.write_str(prompt).context("writing prompt")?;
    let line = term.read_line().context("reading answer")?;
    Ok(line.trim().to_string())
}
