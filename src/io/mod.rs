//! Input/output helpers.
//!
//! - CSV ingest into a design matrix (`ingest`)
//! - run report exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
