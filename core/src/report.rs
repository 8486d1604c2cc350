//! # Sweep results
//!
//! [`ReportSink`] is the one structure workers share while a sweep runs.
//! Once every worker has stopped it is turned into a [`ScanReport`], which also
//! records which addresses of the range never got a result.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use sweepr_common::network::codec;
use sweepr_common::network::range::Ipv4Range;
use tracing::warn;

use crate::scanner::prober::ProbeResult;
use crate::scanner::resolver::{ResolutionResult, UNKNOWN_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub address: Ipv4Addr,
    pub reachable: bool,
    pub name: Option<String>,
    pub probed_at: SystemTime,
}

impl HostRecord {
    pub fn new(probe: ProbeResult, resolution: Option<ResolutionResult>) -> Self {
        Self {
            address: probe.address,
            reachable: probe.reachable,
            name: resolution.and_then(|r| r.name),
            probed_at: probe.probed_at,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The overall sweep budget elapsed.
    BudgetExhausted,
    /// The caller cancelled the sweep.
    Aborted,
    /// A worker died before finishing its address.
    WorkerFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed,
    Cancelled(CancelReason),
}

/// Collects records from concurrent workers, one per address.
#[derive(Debug, Default)]
pub(crate) struct ReportSink {
    entries: Mutex<HashMap<Ipv4Addr, HostRecord>>,
}

impl ReportSink {
    /// Stores `record`, refusing a second record for the same address.
    pub(crate) fn insert(&self, record: HostRecord) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&record.address) {
            warn!("{} was recorded twice, keeping the first result", record.address);
            return false;
        }
        entries.insert(record.address, record);
        true
    }

    pub(crate) fn take_entries(&self) -> HashMap<Ipv4Addr, HostRecord> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    range: Ipv4Range,
    entries: HashMap<Ipv4Addr, HostRecord>,
    outcome: SweepOutcome,
    unfinished: Vec<Ipv4Range>,
    elapsed: Duration,
}

impl ScanReport {
    /// Builds the final report. `frontier` is the first ordinal no worker ever
    /// took; everything from there to the end of the range is unfinished.
    pub(crate) fn build(
        range: Ipv4Range,
        entries: HashMap<Ipv4Addr, HostRecord>,
        frontier: u64,
        cancelled: Option<CancelReason>,
        elapsed: Duration,
    ) -> Self {
        let unfinished: Vec<Ipv4Range> = if entries.len() as u64 == range.width() {
            Vec::new()
        } else {
            unfinished_ranges(range, &entries, frontier)
        };

        let outcome = match (unfinished.is_empty(), cancelled) {
            (true, _) => SweepOutcome::Completed,
            (false, Some(reason)) => SweepOutcome::Cancelled(reason),
            (false, None) => SweepOutcome::Cancelled(CancelReason::WorkerFailed),
        };

        Self {
            range,
            entries,
            outcome,
            unfinished,
            elapsed,
        }
    }

    pub fn range(&self) -> Ipv4Range {
        self.range
    }

    pub fn outcome(&self) -> SweepOutcome {
        self.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == SweepOutcome::Completed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, addr: Ipv4Addr) -> Option<&HostRecord> {
        self.entries.get(&addr)
    }

    pub fn records(&self) -> impl Iterator<Item = &HostRecord> {
        self.entries.values()
    }

    pub fn reachable(&self) -> impl Iterator<Item = &HostRecord> {
        self.records().filter(|record| record.reachable)
    }

    /// Contiguous runs of addresses that never produced a record.
    pub fn unfinished(&self) -> &[Ipv4Range] {
        &self.unfinished
    }

    pub fn unfinished_count(&self) -> u64 {
        self.unfinished.iter().map(Ipv4Range::width).sum()
    }

    pub fn unfinished_addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.unfinished.iter().flat_map(|range| range.iter())
    }
}

fn unfinished_ranges(
    range: Ipv4Range,
    entries: &HashMap<Ipv4Addr, HostRecord>,
    frontier: u64,
) -> Vec<Ipv4Range> {
    let start = u64::from(codec::to_ordinal(range.start()));
    let end = u64::from(codec::to_ordinal(range.end()));
    let frontier = frontier.clamp(start, end + 1);

    let mut gaps: Vec<(u64, u64)> = Vec::new();
    for ordinal in start..frontier {
        if entries.contains_key(&codec::to_address(ordinal as u32)) {
            continue;
        }
        match gaps.last_mut() {
            Some((_, gap_end)) if *gap_end + 1 == ordinal => *gap_end = ordinal,
            _ => gaps.push((ordinal, ordinal)),
        }
    }

    if frontier <= end {
        match gaps.last_mut() {
            Some((_, gap_end)) if *gap_end + 1 == frontier => *gap_end = end,
            _ => gaps.push((frontier, end)),
        }
    }

    gaps.into_iter()
        .map(|(from, to)| Ipv4Range::from_ordinals(from as u32, to as u32))
        .collect::<Result<_, _>>()
        .unwrap_or_default()
}
