//! eqalert daemon library.
//!
//! Exposes the daemon's building blocks for integration testing.
//! In production `eqalert-daemon` is used as a binary (main.rs).

pub mod cli;
pub mod commands;
pub mod feeder;
pub mod logging;
pub mod metrics_server;
pub mod orchestrator;
pub mod output;
pub mod writer;
