//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - execution configuration (`RunMode`, `RunConfig`)
//! - per-run outputs (`RunResult`)

pub mod types;

pub use types::*;
