//! Formatted terminal output.
//!
//! Formatting lives here so the math and orchestration code never prints.

use crate::app::pipeline::RunOutput;
use crate::domain::{RunConfig, RunResult};

/// One `Model <i> MSE: <value>` line per run, in run-index order.
///
/// Labels are 1-based: run index 0 prints as `Model 1`.
pub fn format_run_lines(results: &[RunResult]) -> String {
    let mut out = String::new();
    for r in results {
        out.push_str(&format!("Model {} MSE: {:.6}\n", r.index + 1, r.mse));
    }
    out.pop();
    out
}

/// Dataset shape, split sizes and the fitted coefficients of the first run.
pub fn format_run_summary(run: &RunOutput, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== olsr - OLS fit (normal equations) ===\n");
    out.push_str(&format!("Source: {}\n", run.source));
    out.push_str(&format!(
        "Rows: n={} | features={} ({})\n",
        run.rows,
        config.columns.features.len(),
        fmt_indices(&config.columns.features),
    ));
    out.push_str(&format!(
        "Split: train={} test={} (fraction {:.2})\n",
        run.train_rows, run.test_rows, config.train_frac
    ));
    out.push_str(&format!(
        "Runs: {} | mode={}",
        run.results.len(),
        config.mode.display_name()
    ));
    if let Some(t) = config.threads {
        out.push_str(&format!(" | threads={t}"));
    }
    if config.ridge > 0.0 {
        out.push_str(&format!(" | ridge={}", config.ridge));
    }
    out.push('\n');

    if let Some(first) = run.results.first() {
        out.push_str("\nCoefficients (run 0):\n");
        for (j, b) in first.coefficients.iter().enumerate() {
            let label = match j.checked_sub(1).and_then(|f| config.columns.features.get(f)) {
                Some(col) => format!("col {col}"),
                None if j == 0 => "intercept".to_string(),
                None => format!("beta {j}"),
            };
            out.push_str(&format!("  {label:<10} {b:>14.6}\n"));
        }
    }

    out
}

fn fmt_indices(values: &[usize]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    use crate::data::ColumnSpec;

    fn results() -> Vec<RunResult> {
        vec![
            RunResult {
                index: 0,
                coefficients: DVector::from_row_slice(&[1.0, 2.0]),
                mse: 21.5,
            },
            RunResult {
                index: 1,
                coefficients: DVector::from_row_slice(&[1.0, 2.0]),
                mse: 21.5,
            },
        ]
    }

    #[test]
    fn run_lines_are_labeled_and_ordered() {
        let text = format_run_lines(&results());
        assert_eq!(text, "Model 1 MSE: 21.500000\nModel 2 MSE: 21.500000");
    }

    #[test]
    fn summary_lists_coefficients_by_column() {
        let config = RunConfig {
            columns: ColumnSpec {
                features: vec![4],
                response: None,
            },
            ..RunConfig::default()
        };
        let run = RunOutput {
            source: "x.csv".to_string(),
            rows: 10,
            train_rows: 7,
            test_rows: 3,
            results: results(),
            predictions: None,
        };

        let text = format_run_summary(&run, &config);
        assert!(text.contains("Split: train=7 test=3"));
        assert!(text.contains("intercept"));
        assert!(text.contains("col 4"));
        assert!(text.contains("mode=parallel"));
    }
}
