//! Shared domain types.
//!
//! `RunConfig` is the argv-free form of the `fit` command so the pipeline can
//! be driven from tests. `RunResult` is the unit the orchestrator returns.

use std::path::PathBuf;

use clap::ValueEnum;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::data::ColumnSpec;
use crate::error::AppError;
use crate::math::{DEFAULT_SINGULAR_TOL, FitOptions};

/// How the orchestrator schedules runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One rayon work item per run index.
    Parallel,
    /// Runs execute in index order on the calling thread.
    Sequential,
}

impl RunMode {
    pub fn display_name(self) -> &'static str {
        match self {
            RunMode::Parallel => "parallel",
            RunMode::Sequential => "sequential",
        }
    }
}

/// Outcome of one fit → predict → evaluate cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Launch index; results are always ordered by it.
    pub index: usize,
    pub coefficients: DVector<f64>,
    /// Test-set mean squared error.
    pub mse: f64,
}

/// Fully resolved configuration for `olsr fit`.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: PathBuf,
    pub columns: ColumnSpec,
    pub train_frac: f64,
    pub runs: usize,
    pub mode: RunMode,
    /// Worker threads for parallel mode. `None` uses the global rayon pool.
    pub threads: Option<usize>,
    pub ridge: f64,
    pub singular_tol: f64,
    pub show_summary: bool,
    pub export_json: Option<PathBuf>,
    pub export_predictions: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("boston.csv"),
            columns: ColumnSpec::default(),
            train_frac: 0.7,
            runs: 2,
            mode: RunMode::Parallel,
            threads: None,
            ridge: 0.0,
            singular_tol: DEFAULT_SINGULAR_TOL,
            show_summary: false,
            export_json: None,
            export_predictions: None,
        }
    }
}

impl RunConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            ridge: self.ridge,
            singular_tol: self.singular_tol,
        }
    }

    /// Reject settings that can never produce a valid run.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.train_frac.is_finite() && self.train_frac > 0.0 && self.train_frac < 1.0) {
            return Err(AppError::new(
                2,
                format!("Train fraction must be in (0, 1), got {}.", self.train_frac),
            ));
        }
        if self.runs == 0 {
            return Err(AppError::new(2, "Number of runs must be >= 1."));
        }
        if self.threads == Some(0) {
            return Err(AppError::new(2, "Thread count must be >= 1."));
        }
        if !(self.ridge.is_finite() && self.ridge >= 0.0) {
            return Err(AppError::new(2, "Ridge term must be finite and >= 0."));
        }
        if !(self.singular_tol.is_finite() && self.singular_tol >= 0.0) {
            return Err(AppError::new(2, "Singular tolerance must be finite and >= 0."));
        }

        let mut seen = self.columns.features.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.columns.features.len() {
            return Err(AppError::new(2, "Feature column indices must be distinct."));
        }
        if let Some(r) = self.columns.response {
            if self.columns.features.contains(&r) {
                return Err(AppError::new(
                    2,
                    format!("Response column {r} is also listed as a feature."),
                ));
            }
        }
        Ok(())
    }
}
