//! Logvet daemon library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `logvet-daemon` is used as a binary (main.rs).

pub mod bridge;
pub mod cli;
pub mod fetch;
pub mod link;
pub mod logging;
pub mod metrics_server;
pub mod orchestrator;
