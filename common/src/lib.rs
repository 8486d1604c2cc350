//! Shared models for `sweepr`: configuration, the error taxonomy and the
//! IPv4 address arithmetic every other crate builds on.

pub mod config;
pub mod error;
pub mod network;
