use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::Config;
use sweepr_common::error::{FormatError, SweepError};
use sweepr_core::report::HostRecord;
use sweepr_core::scanner::Sweeper;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::stubs::{StaticProber, StaticResolver};

fn config() -> Config {
    Config {
        timeout: Duration::from_millis(200),
        concurrency: 16,
        ..Config::default()
    }
}

/// Range 192.168.1.1-3 with .1 and .3 answering, only .1 having a PTR record.
#[tokio::test]
async fn sweep_small_range_with_names() {
    let (one, two, three) = (
        Ipv4Addr::new(192, 168, 1, 1),
        Ipv4Addr::new(192, 168, 1, 2),
        Ipv4Addr::new(192, 168, 1, 3),
    );
    let prober = Arc::new(StaticProber::up(&[one, three]));
    let resolver = Arc::new(StaticResolver::default().with(one, &["router.local."]));
    let sweeper = Sweeper::new(prober.clone(), resolver.clone(), &config()).unwrap();

    let report = sweeper
        .sweep("192.168.1.1", "192.168.1.3", CancellationToken::new())
        .await
        .expect("valid range");

    assert!(report.is_complete());
    assert_eq!(report.len(), 3);

    let first = report.get(one).unwrap();
    assert!(first.reachable);
    assert_eq!(first.name.as_deref(), Some("router.local"));

    let second = report.get(two).unwrap();
    assert!(!second.reachable);
    assert_eq!(second.name, None);

    let third = report.get(three).unwrap();
    assert!(third.reachable);
    assert_eq!(third.name, None);
    assert_eq!(third.display_name(), "Unknown");

    // Unreachable hosts are never looked up.
    assert_eq!(resolver.lookups(), 2);
}

#[tokio::test]
async fn reversed_range_is_rejected_before_probing() {
    let prober = Arc::new(StaticProber::default());
    let sweeper = Sweeper::new(prober.clone(), Arc::new(StaticResolver::default()), &config()).unwrap();

    let result = sweeper
        .sweep("10.0.0.5", "10.0.0.1", CancellationToken::new())
        .await;

    assert_eq!(
        result.unwrap_err(),
        SweepError::Format(FormatError::StartAfterEnd {
            start: Ipv4Addr::new(10, 0, 0, 5),
            end: Ipv4Addr::new(10, 0, 0, 1),
        })
    );
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn malformed_endpoints_are_rejected() {
    let prober = Arc::new(StaticProber::default());
    let sweeper = Sweeper::new(prober.clone(), Arc::new(StaticResolver::default()), &config()).unwrap();

    for (start, end) in [("10.0.0.1", "10.0.0"), ("::1", "10.0.0.1"), ("10.0.0.1", "10.0.0.1/24")] {
        let result = sweeper.sweep(start, end, CancellationToken::new()).await;
        assert!(matches!(result, Err(SweepError::Format(_))), "{start}-{end} accepted");
    }
    assert_eq!(prober.calls(), 0);
}

#[tokio::test]
async fn completed_sweep_streams_every_address_once() {
    let up: Vec<Ipv4Addr> = (1..=254).step_by(7).map(|d| Ipv4Addr::new(10, 9, 0, d)).collect();
    let sweeper = Sweeper::new(
        Arc::new(StaticProber::up(&up)),
        Arc::new(StaticResolver::default()),
        &config(),
    )
    .unwrap();
    let range = sweeper.prepare("10.9.0.0", "10.9.3.255").unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel::<HostRecord>();

    let report = sweeper
        .scan_streaming(range, CancellationToken::new(), tx)
        .await
        .unwrap();

    let mut streamed = HashSet::new();
    while let Some(record) = rx.recv().await {
        assert!(streamed.insert(record.address), "{} streamed twice", record.address);
    }

    assert!(report.is_complete());
    assert_eq!(report.len(), 1024);
    assert_eq!(streamed.len(), 1024);
    assert!(range.iter().all(|addr| report.get(addr).is_some()));
    assert_eq!(report.reachable().count(), up.len());
    assert!(report.unfinished().is_empty());
}

#[tokio::test]
async fn classification_is_stable_across_sweeps() {
    let up = [Ipv4Addr::new(172, 16, 0, 4), Ipv4Addr::new(172, 16, 0, 9)];
    let sweeper = Sweeper::new(
        Arc::new(StaticProber::up(&up)),
        Arc::new(StaticResolver::default()),
        &config(),
    )
    .unwrap();

    let first = sweeper
        .sweep("172.16.0.1", "172.16.0.20", CancellationToken::new())
        .await
        .unwrap();
    let second = sweeper
        .sweep("172.16.0.1", "172.16.0.20", CancellationToken::new())
        .await
        .unwrap();

    for record in first.records() {
        assert_eq!(second.get(record.address).unwrap().reachable, record.reachable);
    }
    assert_eq!(first.reachable().count(), 2);
}
