//! Independent fit/evaluate runs, executed in parallel or sequentially.
//!
//! Each run is one blocking computation on shared, read-only train/test data:
//!
//! - fit β on the train split
//! - predict on the test design matrix
//! - MSE against the test response
//!
//! Runs own all their intermediates (Gram matrix, inverse, β). Parallel mode
//! gathers results through rayon's indexed `collect`, so output order is the
//! launch order no matter which run finishes first.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::data::Dataset;
use crate::domain::{RunMode, RunResult};
use crate::math::{FitOptions, RegressionError, evaluate, fit_with, predict};

/// A run failure attributed to its launch index.
///
/// Displays both the 0-based index and the 1-based `Model <i>` label used by
/// the MSE report lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RunError {
    pub index: usize,
    pub source: RegressionError,
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run {} (Model {}) failed: {}",
            self.index,
            self.index + 1,
            self.source
        )
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Options shared by every run of a [`run_many`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub mode: RunMode,
    pub fit: FitOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Parallel,
            fit: FitOptions::default(),
        }
    }
}

/// Execute `num_runs` fit/evaluate cycles and return results ordered by index.
///
/// Any failing run aborts the whole call. The reported error is the failing
/// run with the lowest index among those that actually ran.
pub fn run_many(
    num_runs: usize,
    train: &Dataset,
    test: &Dataset,
    opts: &RunOptions,
) -> Result<Vec<RunResult>, RunError> {
    run_many_with(num_runs, train, test, opts, |_| {})
}

/// [`run_many`] with a hook invoked with the run index as each run starts.
pub fn run_many_with<F>(
    num_runs: usize,
    train: &Dataset,
    test: &Dataset,
    opts: &RunOptions,
    on_start: F,
) -> Result<Vec<RunResult>, RunError>
where
    F: Fn(usize) + Sync,
{
    match opts.mode {
        RunMode::Sequential => {
            let mut out = Vec::with_capacity(num_runs);
            for index in 0..num_runs {
                on_start(index);
                let result = run_once(index, train, test, &opts.fit)
                    .map_err(|source| RunError { index, source })?;
                out.push(result);
            }
            Ok(out)
        }
        RunMode::Parallel => {
            // Once any run fails, runs that have not started yet are skipped (None).
            let abort = AtomicBool::new(false);
            let outcomes: Vec<Option<Result<RunResult, RegressionError>>> = (0..num_runs)
                .into_par_iter()
                .map(|index| {
                    if abort.load(Ordering::Acquire) {
                        return None;
                    }
                    on_start(index);
                    let outcome = run_once(index, train, test, &opts.fit);
                    if outcome.is_err() {
                        abort.store(true, Ordering::Release);
                    }
                    Some(outcome)
                })
                .collect();
            gather(outcomes)
        }
    }
}

/// One fit → predict → evaluate cycle.
pub fn run_once(
    index: usize,
    train: &Dataset,
    test: &Dataset,
    fit_opts: &FitOptions,
) -> Result<RunResult, RegressionError> {
    let coefficients = fit_with(train.x(), train.y(), fit_opts)?;
    let y_pred = predict(&coefficients, test.x())?;
    let mse = evaluate(test.y(), &y_pred)?;
    tracing::debug!(run = index, mse, "run finished");
    Ok(RunResult {
        index,
        coefficients,
        mse,
    })
}

fn gather(outcomes: Vec<Option<Result<RunResult, RegressionError>>>) -> Result<Vec<RunResult>, RunError> {
    let mut results = Vec::with_capacity(outcomes.len());
    let mut skipped = false;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Some(Ok(r)) => results.push(r),
            Some(Err(source)) => return Err(RunError { index, source }),
            None => skipped = true,
        }
    }
    // A skip only happens after a failure, and failures return above.
    debug_assert!(!skipped);
    Ok(results)
}
