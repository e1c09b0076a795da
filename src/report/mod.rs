//! Reporting utilities: run statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::RunResult;

/// Largest minus smallest MSE across runs.
///
/// Identical inputs give identical runs, so anything but `0.0` means the
/// runs did not see the same data.
pub fn mse_spread(results: &[RunResult]) -> f64 {
    let mut iter = results.iter().map(|r| r.mse);
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (lo, hi) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    hi - lo
}
