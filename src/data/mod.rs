//! Dataset construction: design matrices, splits, and synthetic samples.

pub mod dataset;
pub mod sample;

pub use dataset::*;
pub use sample::*;
