//! Run orchestration.
//!
//! Responsibilities:
//!
//! - launch N independent fit/evaluate cycles (parallel or sequential)
//! - gather results in launch order
//! - attribute failures to the run that produced them

pub mod orchestrator;

pub use orchestrator::*;
