//! Shared "fit pipeline" logic.
//!
//! Keeping the workflow in one place keeps `app` focused on presentation:
//! CSV load -> contiguous split -> N runs -> ordered results (+ test predictions)

use nalgebra::DVector;

use crate::data::Dataset;
use crate::domain::{RunConfig, RunMode, RunResult};
use crate::error::AppError;
use crate::io::ingest::load_dataset;
use crate::math::predict;
use crate::report::mse_spread;
use crate::run::{RunOptions, run_many};

/// Test-set predictions of run 0, kept for `--export-predictions`.
#[derive(Debug, Clone)]
pub struct TestPredictions {
    /// Dataset row index of the first test row.
    pub first_row: usize,
    pub y_true: DVector<f64>,
    pub y_pred: DVector<f64>,
}

/// All computed outputs of a single `olsr fit` invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: String,
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Ordered by run index.
    pub results: Vec<RunResult>,
    pub predictions: Option<TestPredictions>,
}

/// Load the configured CSV and execute all runs.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    // Fail on bad settings before touching the file system.
    config.validate()?;
    let dataset = load_dataset(&config.csv_path, &config.columns)?;
    run_fit_with_dataset(config, &dataset, config.csv_path.display().to_string())
}

/// Execute all runs on an already-built dataset.
pub fn run_fit_with_dataset(
    config: &RunConfig,
    dataset: &Dataset,
    source: String,
) -> Result<RunOutput, AppError> {
    config.validate()?;
    tracing::info!(
        source = %source,
        rows = dataset.n_rows(),
        features = dataset.n_features(),
        "dataset loaded"
    );

    let split = dataset.split(config.train_frac)?;
    split.require_non_empty()?;
    tracing::info!(
        train = split.train.n_rows(),
        test = split.test.n_rows(),
        "split dataset"
    );

    let opts = RunOptions {
        mode: config.mode,
        fit: config.fit_options(),
    };
    let results = match (config.mode, config.threads) {
        (RunMode::Parallel, Some(threads)) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AppError::new(2, format!("Failed to build thread pool: {e}")))?;
            pool.install(|| run_many(config.runs, &split.train, &split.test, &opts))?
        }
        _ => run_many(config.runs, &split.train, &split.test, &opts)?,
    };

    let spread = mse_spread(&results);
    if spread != 0.0 {
        tracing::warn!(spread, "run MSEs differ across identical inputs");
    }

    let predictions = match (&config.export_predictions, results.first()) {
        (Some(_), Some(first)) => Some(TestPredictions {
            first_row: split.train.n_rows(),
            y_true: split.test.y().clone(),
            y_pred: predict(&first.coefficients, split.test.x())?,
        }),
        _ => None,
    };

    Ok(RunOutput {
        source,
        rows: dataset.n_rows(),
        train_rows: split.train.n_rows(),
        test_rows: split.test.n_rows(),
        results,
        predictions,
    })
}
