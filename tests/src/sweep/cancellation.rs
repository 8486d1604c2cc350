use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::Config;
use sweepr_core::report::{CancelReason, SweepOutcome};
use sweepr_core::scanner::Sweeper;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::stubs::{StallingProber, StaticResolver};

fn config() -> Config {
    Config {
        timeout: Duration::from_secs(30),
        concurrency: 8,
        ..Config::default()
    }
}

#[tokio::test]
async fn abort_mid_sweep_reports_unfinished_addresses() {
    let sweeper = Sweeper::new(
        Arc::new(StallingProber::after(10)),
        Arc::new(StaticResolver::default()),
        &config(),
    )
    .unwrap();
    let range = sweeper.prepare("10.0.0.1", "10.0.3.232").unwrap();
    assert_eq!(range.width(), 1000);

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let (report, _) = tokio::join!(sweeper.scan_streaming(range, cancel.clone(), tx), async {
        for _ in 0..10 {
            rx.recv().await;
        }
        cancel.cancel();
    });
    let report = report.unwrap();

    assert_eq!(report.outcome(), SweepOutcome::Cancelled(CancelReason::Aborted));
    assert!(!report.is_complete());
    assert_eq!(report.len(), 10);
    assert_eq!(report.unfinished_count(), 990);
    assert_eq!(report.unfinished_addrs().count(), 990);
    assert!(
        report
            .unfinished_addrs()
            .all(|addr| report.get(addr).is_none() && range.contains(addr))
    );
}

#[tokio::test]
async fn budget_stops_a_stalled_sweep() {
    let config = Config {
        budget: Some(Duration::from_millis(200)),
        ..config()
    };
    let sweeper = Sweeper::new(
        Arc::new(StallingProber::after(5)),
        Arc::new(StaticResolver::default()),
        &config,
    )
    .unwrap();
    let range = sweeper.prepare("10.1.0.1", "10.1.0.100").unwrap();

    let report = sweeper.scan(range, CancellationToken::new()).await.unwrap();

    assert_eq!(
        report.outcome(),
        SweepOutcome::Cancelled(CancelReason::BudgetExhausted)
    );
    assert_eq!(report.len(), 5);
    assert_eq!(report.unfinished_count(), 95);
    assert!(report.get(Ipv4Addr::new(10, 1, 0, 100)).is_none());
}
