//! `ols-runs` library crate.
//!
//! The binary (`olsr`) is a thin wrapper around this library so that:
//!
//! - the regression engine and orchestrator are testable without spawning processes
//! - the engine (`math`) stays free of any I/O or CLI concerns

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod run;
