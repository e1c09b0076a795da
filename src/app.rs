//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the fit pipeline or the synthetic sample writer
//! - prints reports and writes optional exports

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, SynthArgs};
use crate::data::{ColumnSpec, SampleConfig, generate_sample, write_sample_csv};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::export::{RunRecord, RunReport, write_predictions_csv, write_report_json};

pub mod pipeline;

/// Environment variable naming the default input CSV.
pub const CSV_ENV: &str = "OLS_RUNS_CSV";
const DEFAULT_CSV: &str = "boston.csv";

/// Entry point for the `olsr` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // `olsr` and `olsr --csv data.csv` behave like `olsr fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args, std::env::var(CSV_ENV).ok());
    let run = pipeline::run_fit(&config)?;

    if config.show_summary {
        println!("{}", crate::report::format_run_summary(&run, &config));
    }
    println!("{}", crate::report::format_run_lines(&run.results));

    if let Some(path) = &config.export_json {
        let report = RunReport {
            tool: "olsr".to_string(),
            generated_at: Utc::now(),
            source: run.source.clone(),
            rows: run.rows,
            features: config.columns.features.clone(),
            train_rows: run.train_rows,
            test_rows: run.test_rows,
            mode: config.mode,
            ridge: config.ridge,
            runs: run.results.iter().map(RunRecord::from).collect(),
        };
        write_report_json(path, &report)?;
        tracing::info!(path = %path.display(), "wrote run report");
    }
    if let (Some(path), Some(preds)) = (&config.export_predictions, &run.predictions) {
        write_predictions_csv(path, preds.first_row, &preds.y_true, &preds.y_pred)?;
        tracing::info!(path = %path.display(), "wrote test predictions");
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        rows: args.rows,
        coefficients: args.coefficients.clone(),
        noise_sd: args.noise,
        feature_min: args.min,
        feature_max: args.max,
        seed: args.seed,
    };
    let sample = generate_sample(&config)?;
    write_sample_csv(&args.out, &sample)?;

    let p = sample.dataset.n_features();
    let features: Vec<String> = (1..=p).map(|j| j.to_string()).collect();
    println!(
        "Wrote {} rows to {} (fit with: olsr fit --csv {} --features {})",
        sample.dataset.n_rows(),
        args.out.display(),
        args.out.display(),
        features.join(",")
    );
    Ok(())
}

/// Resolve CLI flags plus the optional `OLS_RUNS_CSV` value into a config.
pub fn run_config_from_args(args: &FitArgs, env_csv: Option<String>) -> RunConfig {
    let csv_path = args
        .csv
        .clone()
        .or_else(|| env_csv.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV));

    RunConfig {
        csv_path,
        columns: ColumnSpec {
            features: args.features.clone(),
            response: args.response,
        },
        train_frac: args.train_frac,
        runs: args.runs,
        mode: args.mode,
        threads: args.threads,
        ridge: args.ridge,
        singular_tol: args.singular_tol,
        show_summary: args.summary,
        export_json: args.export_json.clone(),
        export_predictions: args.export_predictions.clone(),
    }
}

/// Rewrite argv so `olsr` defaults to `olsr fit`.
///
/// Rules:
/// - `olsr`                       -> `olsr fit`
/// - `olsr --csv data.csv ...`    -> `olsr fit --csv data.csv ...`
/// - `olsr --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "synth");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    argv
}
