//! # Sweep engine
//!
//! Probes every address of an [`Ipv4Range`](sweepr_common::network::range::Ipv4Range)
//! with a bounded worker pool, resolves names for the hosts that answered and
//! collects everything into a [`report::ScanReport`].

pub mod report;
pub mod scanner;
