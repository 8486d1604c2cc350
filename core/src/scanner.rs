//! The sweep coordinator.
//!
//! A [`Sweeper`] walks an [`Ipv4Range`] with a fixed number of workers. Each
//! worker pulls the next ordinal from a shared cursor, probes the address,
//! resolves its name if it answered, and stores the result. The sweep ends when
//! every worker has returned, either because the range is exhausted or because
//! the cancellation token fired (caller abort or budget).
//!
//! Probing and name resolution are behind the [`EchoProber`] and
//! [`NameResolver`] traits so they can be swapped without touching this module.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use sweepr_common::config::Config;
use sweepr_common::error::SweepError;
use sweepr_common::network::codec;
use sweepr_common::network::range::Ipv4Range;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::report::{CancelReason, HostRecord, ReportSink, ScanReport};

pub mod prober;
pub mod resolver;
pub mod task;

use prober::{EchoProber, ProbeResult, SystemPing};
use resolver::{DnsResolver, NameResolver, NoResolver};
use task::AddressTask;

/// Slack on top of the probe timeout before the coordinator gives up on a prober.
const PROBE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSettings {
    pub timeout: Duration,
    pub concurrency: usize,
    pub budget: Option<Duration>,
    pub retries: u8,
    pub max_range_width: Option<u64>,
}

impl From<&Config> for SweepSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            timeout: cfg.timeout,
            concurrency: cfg.concurrency,
            budget: cfg.budget,
            retries: cfg.retries,
            max_range_width: cfg.max_range_width(),
        }
    }
}

pub struct Sweeper {
    prober: Arc<dyn EchoProber>,
    resolver: Arc<dyn NameResolver>,
    settings: SweepSettings,
}

impl Sweeper {
    pub fn new(
        prober: Arc<dyn EchoProber>,
        resolver: Arc<dyn NameResolver>,
        cfg: &Config,
    ) -> Result<Self, SweepError> {
        cfg.validate()?;
        Ok(Self {
            prober,
            resolver,
            settings: SweepSettings::from(cfg),
        })
    }

    /// A sweeper using the system `ping` and, unless disabled, reverse DNS.
    pub fn from_config(cfg: &Config) -> Result<Self, SweepError> {
        let resolver: Arc<dyn NameResolver> = if cfg.no_dns {
            Arc::new(NoResolver)
        } else {
            let dns = cfg
                .dns_server
                .map(DnsResolver::new)
                .unwrap_or_else(DnsResolver::from_system);
            debug!("Resolving names through {}", dns.server());
            Arc::new(dns)
        };
        Self::new(Arc::new(SystemPing::default()), resolver, cfg)
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Parses and validates both endpoints, including the width ceiling.
    pub fn prepare(&self, start: &str, end: &str) -> Result<Ipv4Range, SweepError> {
        let range = Ipv4Range::parse(start, end)?;
        range.check_width(self.settings.max_range_width)?;
        Ok(range)
    }

    pub async fn sweep(
        &self,
        start: &str,
        end: &str,
        cancel: CancellationToken,
    ) -> Result<ScanReport, SweepError> {
        let range = self.prepare(start, end)?;
        self.scan(range, cancel).await
    }

    pub async fn scan(
        &self,
        range: Ipv4Range,
        cancel: CancellationToken,
    ) -> Result<ScanReport, SweepError> {
        self.run(range, cancel, None).await
    }

    /// Like [`Sweeper::scan`], additionally sending each record on `updates`
    /// as soon as it is stored.
    pub async fn scan_streaming(
        &self,
        range: Ipv4Range,
        cancel: CancellationToken,
        updates: UnboundedSender<HostRecord>,
    ) -> Result<ScanReport, SweepError> {
        self.run(range, cancel, Some(updates)).await
    }

    async fn run(
        &self,
        range: Ipv4Range,
        cancel: CancellationToken,
        updates: Option<UnboundedSender<HostRecord>>,
    ) -> Result<ScanReport, SweepError> {
        range.check_width(self.settings.max_range_width)?;

        let started = Instant::now();
        let start = u64::from(codec::to_ordinal(range.start()));
        let end = u64::from(codec::to_ordinal(range.end()));
        let workers = self.settings.concurrency.min(usize::try_from(range.width()).unwrap_or(usize::MAX));

        info!("Sweeping {range} ({} addresses) with {workers} workers", range.width());

        let cancel = cancel.child_token();
        let budget_hit = Arc::new(AtomicBool::new(false));
        if let Some(budget) = self.settings.budget {
            spawn_budget_timer(budget, cancel.clone(), budget_hit.clone());
        }

        let ctx = Arc::new(SweepContext {
            prober: self.prober.clone(),
            resolver: self.resolver.clone(),
            settings: self.settings,
            sink: ReportSink::default(),
            cursor: AtomicU64::new(start),
            end,
            updates,
        });

        let mut set = JoinSet::new();
        for _ in 0..workers {
            set.spawn(worker(ctx.clone(), cancel.clone()));
        }
        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                error!("Sweep worker failed: {e}");
            }
        }

        let was_cancelled = cancel.is_cancelled();
        // Stops the budget timer.
        cancel.cancel();

        let frontier = ctx.cursor.load(Ordering::Acquire);
        let reason = was_cancelled.then(|| {
            if budget_hit.load(Ordering::Acquire) {
                CancelReason::BudgetExhausted
            } else {
                CancelReason::Aborted
            }
        });

        let report = ScanReport::build(range, ctx.sink.take_entries(), frontier, reason, started.elapsed());
        if report.is_complete() {
            info!("Sweep of {range} finished in {:.2?}", report.elapsed());
        } else {
            warn!(
                "Sweep of {range} stopped early, {} addresses were not checked",
                report.unfinished_count()
            );
        }
        Ok(report)
    }
}

/// Shared state of one sweep.
pub(crate) struct SweepContext {
    pub(crate) prober: Arc<dyn EchoProber>,
    pub(crate) resolver: Arc<dyn NameResolver>,
    pub(crate) settings: SweepSettings,
    sink: ReportSink,
    cursor: AtomicU64,
    end: u64,
    updates: Option<UnboundedSender<HostRecord>>,
}

impl SweepContext {
    fn next_address(&self) -> Option<Ipv4Addr> {
        let ordinal = self.cursor.fetch_add(1, Ordering::AcqRel);
        (ordinal <= self.end).then(|| codec::to_address(ordinal as u32))
    }

    /// Probes `addr`, retrying down hosts up to the configured count.
    pub(crate) async fn probe(&self, addr: Ipv4Addr) -> ProbeResult {
        let timeout = self.settings.timeout;
        for attempt in 0..=self.settings.retries {
            let reachable = tokio::time::timeout(timeout + PROBE_GRACE, self.prober.probe(addr, timeout))
                .await
                .unwrap_or(false);
            if reachable {
                return ProbeResult::new(addr, true);
            }
            if attempt < self.settings.retries {
                debug!("{addr}: no reply, retrying ({}/{})", attempt + 1, self.settings.retries);
            }
        }
        ProbeResult::new(addr, false)
    }

    fn record(&self, record: HostRecord) {
        if self.sink.insert(record.clone())
            && let Some(updates) = &self.updates
        {
            let _ = updates.send(record);
        }
    }
}

async fn worker(ctx: Arc<SweepContext>, cancel: CancellationToken) {
    loop {
        // Probers that never wait would otherwise starve the budget timer.
        tokio::task::yield_now().await;
        if cancel.is_cancelled() {
            break;
        }
        let Some(addr) = ctx.next_address() else {
            break;
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("{addr}: abandoned");
                break;
            }
            record = AddressTask::new(addr).run(&ctx) => ctx.record(record),
        }
    }
}

fn spawn_budget_timer(budget: Duration, cancel: CancellationToken, budget_hit: Arc<AtomicBool>) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(budget) => {
                warn!("Sweep budget of {budget:?} exhausted, cancelling");
                budget_hit.store(true, Ordering::Release);
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });
}
