use anyhow::Context;
use sweepr_common::config::Config;
use sweepr_core::report::{ScanReport, SweepOutcome};
use sweepr_core::scanner::Sweeper;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::terminal::{print, prompt, spinner::SweepProgress};

pub async fn sweep(start: Option<String>, end: Option<String>, cfg: &Config) -> anyhow::Result<()> {
    let sweeper = Sweeper::from_config(cfg).context("invalid settings")?;
    let (start, end) = prompt::endpoints(start, end)?;
    let range = sweeper.prepare(&start, &end)?;

    if !cfg.quiet {
        print::sweep_banner(range);
    }
    info!("Sweeping {range} with {} workers", sweeper.settings().concurrency);

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn(abort_on_ctrl_c(cancel.clone()));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut progress = SweepProgress::start(range.width(), cfg.quiet);

    let (report, _) = tokio::join!(sweeper.scan_streaming(range, cancel.clone(), tx), async {
        while let Some(record) = rx.recv().await {
            progress.advance(record.reachable);
            if record.reachable || cfg.show_unreachable {
                progress.suspend(|| print::host_line(&record));
            }
        }
    });
    ctrl_c.abort();
    progress.finish_and_clear();

    let report = report?;
    sweep_ends(&report, cfg);
    Ok(())
}

async fn abort_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, stopping the sweep");
        cancel.cancel();
    }
}

fn sweep_ends(report: &ScanReport, cfg: &Config) {
    if !cfg.quiet {
        print::summary(report);
        return;
    }

    if let SweepOutcome::Cancelled(reason) = report.outcome() {
        warn!(
            "Sweep {}: {} addresses were not swept",
            print::cancel_text(reason),
            report.unfinished_count()
        );
        for line in print::unfinished_lines(report.unfinished()) {
            warn!("  {line}");
        }
    }
}
