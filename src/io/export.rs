//! Export run results.
//!
//! - JSON run report: configuration echo plus every run's coefficients and MSE
//! - CSV of test-set predictions for a single run

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{RunMode, RunResult};
use crate::error::AppError;

/// Serialized form of a whole `fit` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub rows: usize,
    pub features: Vec<usize>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub mode: RunMode,
    pub ridge: f64,
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub index: usize,
    pub coefficients: Vec<f64>,
    pub mse: f64,
}

impl From<&RunResult> for RunRecord {
    fn from(r: &RunResult) -> Self {
        Self {
            index: r.index,
            coefficients: r.coefficients.iter().copied().collect(),
            mse: r.mse,
        }
    }
}

/// Write the JSON run report.
pub fn write_report_json(path: &Path, report: &RunReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Write per-row test predictions: `row,y_true,y_pred,residual`.
///
/// `first_row` is the dataset row index of the first test row, so rows line
/// up with the input file.
pub fn write_predictions_csv(
    path: &Path,
    first_row: usize,
    y_true: &DVector<f64>,
    y_pred: &DVector<f64>,
) -> Result<(), AppError> {
    if y_true.len() != y_pred.len() {
        return Err(AppError::new(
            4,
            format!(
                "Prediction length ({}) != response length ({}).",
                y_pred.len(),
                y_true.len()
            ),
        ));
    }

    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create predictions CSV '{}': {e}", path.display())))?;

    writeln!(file, "row,y_true,y_pred,residual")
        .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV header: {e}")))?;

    for (i, (t, p)) in y_true.iter().zip(y_pred.iter()).enumerate() {
        writeln!(file, "{},{:.10},{:.10},{:.10}", first_row + i, t, p, t - p)
            .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV row: {e}")))?;
    }

    Ok(())
}
