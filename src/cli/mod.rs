//! Command-line parsing for the OLS run tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the regression code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::RunMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "olsr", version, about = "Concurrent OLS fit/evaluate runs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit OLS on a CSV split and print the test MSE of every run.
    Fit(FitArgs),
    /// Write a synthetic CSV with known coefficients.
    Synth(SynthArgs),
}

/// Options for `olsr fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV (header row skipped). Falls back to `OLS_RUNS_CSV`, then `boston.csv`.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Feature column indices (0-based, comma separated).
    #[arg(short = 'f', long, value_delimiter = ',', default_values_t = [1, 5, 12, 10])]
    pub features: Vec<usize>,

    /// Response column index (0-based). Defaults to the last column.
    #[arg(long)]
    pub response: Option<usize>,

    /// Fraction of leading rows used for training.
    #[arg(long, default_value_t = 0.7)]
    pub train_frac: f64,

    /// Number of independent runs.
    #[arg(short = 'n', long, default_value_t = 2)]
    pub runs: usize,

    /// Execution mode for the runs.
    #[arg(long, value_enum, default_value_t = RunMode::Parallel)]
    pub mode: RunMode,

    /// Worker threads for parallel mode (default: rayon's global pool).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Ridge term added to the Gram diagonal (0 = plain OLS).
    #[arg(long, default_value_t = 0.0)]
    pub ridge: f64,

    /// Rank tolerance: XᵗX is singular when λ_min ≤ tol·k·λ_max (k = coefficients).
    #[arg(long, default_value_t = crate::math::DEFAULT_SINGULAR_TOL)]
    pub singular_tol: f64,

    /// Print dataset/split info and fitted coefficients before the MSE lines.
    #[arg(long)]
    pub summary: bool,

    /// Export all run results to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export test-set predictions of the first run to CSV.
    #[arg(long = "export-predictions", value_name = "CSV")]
    pub export_predictions: Option<PathBuf>,
}

/// Options for `olsr synth`.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(long, default_value_t = 500)]
    pub rows: usize,

    /// True coefficients, intercept first (comma separated).
    #[arg(
        long = "coef",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = [3.0, 1.5, -2.0, 0.5]
    )]
    pub coefficients: Vec<f64>,

    /// Standard deviation of the Gaussian noise.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Lower bound of the uniform feature range.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper bound of the uniform feature range.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub max: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_match_reference_setup() {
        let cli = Cli::parse_from(["olsr", "fit"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.features, vec![1, 5, 12, 10]);
        assert_eq!(args.runs, 2);
        assert_eq!(args.mode, RunMode::Parallel);
        assert!((args.train_frac - 0.7).abs() < 1e-12);
        assert!(args.response.is_none());
    }

    #[test]
    fn fit_parses_lists_and_mode() {
        let cli = Cli::parse_from([
            "olsr", "fit", "--csv", "d.csv", "-f", "1,2,3", "-n", "5", "--mode", "sequential",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.csv, Some(PathBuf::from("d.csv")));
        assert_eq!(args.features, vec![1, 2, 3]);
        assert_eq!(args.runs, 5);
        assert_eq!(args.mode, RunMode::Sequential);
    }

    #[test]
    fn synth_accepts_negative_coefficients() {
        let cli = Cli::parse_from(["olsr", "synth", "--out", "s.csv", "--coef", "-1,2.5"]);
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.coefficients, vec![-1.0, 2.5]);
    }
}
