//! amdahl-sieve - Distributed segmented sieve benchmark
//!
//! Entry point for the CLI application.

use amdahl_sieve::config::{RunConfig, SieveArgs};
use amdahl_sieve::harness::run_experiments;
use amdahl_sieve::progress::{print_header, print_summary};
use amdahl_sieve::sieve::DistributedSieve;
use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = SieveArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    // Print header
    if config.show_progress {
        print_header(
            &config.sizes,
            config.worker_count,
            config.trials,
            &config.output_dir.display().to_string(),
        );
    }

    // Build the fixed worker group
    let sieve = DistributedSieve::new(config.worker_count, config.value_threshold)
        .context("Failed to initialize worker group")?;

    info!(
        workers = config.worker_count,
        sizes = config.sizes.len(),
        trials = config.trials,
        "starting experiments"
    );

    let start = Instant::now();
    let outcome = run_experiments(&sieve, &config).context("Experiment run failed")?;

    info!(
        sizes = outcome.summaries.len(),
        csv = %outcome.csv_path.display(),
        txt = %outcome.txt_path.display(),
        "experiments complete"
    );

    // Print summary
    if config.show_progress {
        print_summary(
            &outcome.summaries,
            start.elapsed(),
            &outcome.csv_path,
            &outcome.txt_path,
        );
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("amdahl_sieve=debug,warn")
    } else {
        EnvFilter::new("amdahl_sieve=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
