//! Experiment harness
//!
//! Drives sizes x trials through a [`TrialRunner`], feeding every record to
//! the report writers and the progress display. The harness depends only on
//! the `TrialRunner` abstraction, never on a concrete sieve.

use crate::config::RunConfig;
use crate::error::Result;
use crate::measure::{Measurement, SizeSummary};
use crate::progress::ProgressReporter;
use crate::report::ReportWriter;
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs one sieve trial at a time
pub trait TrialRunner {
    /// Number of ranks participating in each trial
    fn worker_count(&self) -> usize;

    /// Run one trial for bound `n` and return the coordinator's record.
    ///
    /// Callable repeatedly and independently for different bounds; must be
    /// safe for `n = 0` and `n = 1` (no primes).
    fn run_trial(&self, n: u64) -> Result<Measurement>;
}

/// Everything an experiment run produced
#[derive(Debug)]
pub struct ExperimentOutcome {
    /// Per-size averages, in input order
    pub summaries: Vec<SizeSummary>,

    /// Path of the CSV report
    pub csv_path: PathBuf,

    /// Path of the text report
    pub txt_path: PathBuf,
}

/// Run every configured size for the configured number of trials.
///
/// Any failure aborts the whole experiment; partially written reports are
/// left on disk but never presented as results.
pub fn run_experiments(runner: &dyn TrialRunner, config: &RunConfig) -> Result<ExperimentOutcome> {
    let mut report = ReportWriter::create(&config.output_dir, runner.worker_count())?;
    let progress = config.show_progress.then(ProgressReporter::new);

    let mut summaries = Vec::with_capacity(config.sizes.len());
    for &size in &config.sizes {
        info!(size, trials = config.trials, "benchmarking size");
        report.begin_size(size)?;

        let mut trials: Vec<Measurement> = Vec::with_capacity(config.trials);
        for trial in 1..=config.trials {
            if let Some(p) = &progress {
                p.trial_started(size, trial, config.trials);
            }

            let record = runner.run_trial(size)?;
            debug!(
                size,
                trial,
                total_us = record.total_us,
                parallel_us = record.parallel_us,
                sequential_us = record.sequential_us,
                prime_count = record.prime_count,
                "trial complete"
            );

            report.record_trial(size, trial, &record)?;
            if let Some(p) = &progress {
                p.trial_finished(size, trial, config.trials, record.prime_count);
            }
            trials.push(record);
        }

        let summary = SizeSummary::from_trials(size, &trials);
        let primes = trials.first().map(|m| m.primes.as_slice()).unwrap_or(&[]);
        report.record_average(&summary, primes)?;
        if let Some(p) = &progress {
            p.size_finished(&summary);
        }
        summaries.push(summary);
    }

    let (csv_path, txt_path) = report.finish()?;
    if let Some(p) = &progress {
        p.finish("Experiments complete");
    }

    Ok(ExperimentOutcome {
        summaries,
        csv_path,
        txt_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SieveArgs;
    use crate::sieve::base::sieve_upto;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Single-process runner used to exercise the harness without a group
    struct ReferenceRunner;

    impl TrialRunner for ReferenceRunner {
        fn worker_count(&self) -> usize {
            1
        }

        fn run_trial(&self, n: u64) -> Result<Measurement> {
            let primes = sieve_upto(n);
            Ok(Measurement {
                total_us: 10,
                sequential_us: 4,
                parallel_us: 6,
                prime_count: primes.len() as u64,
                primes,
                worker_count: 1,
            })
        }
    }

    #[test]
    fn test_harness_runs_all_sizes_and_trials() {
        let dir = tempdir().unwrap();
        let config = RunConfig::from_args(SieveArgs {
            sizes: vec![10, 30],
            workers: 1,
            trials: 3,
            output_dir: dir.path().to_path_buf(),
            threshold: 10_000,
            quiet: true,
            verbose: false,
        })
        .unwrap();

        let outcome = run_experiments(&ReferenceRunner, &config).unwrap();
        assert_eq!(outcome.summaries.len(), 2);
        assert_eq!(outcome.summaries[0].prime_count, 4);
        assert_eq!(outcome.summaries[1].prime_count, 10);
        assert_eq!(outcome.summaries[0].trials, 3);
        assert!(outcome.csv_path.exists());
        assert!(outcome.txt_path.exists());

        let csv = std::fs::read_to_string(&outcome.csv_path).unwrap();
        // 2 sizes x (3 trials + AVERAGE) data rows
        assert_eq!(csv.lines().filter(|l| !l.is_empty()).count(), 1 + 2 * 4);
    }

    #[test]
    fn test_report_dir_is_created() {
        let dir = tempdir().unwrap();
        let nested: PathBuf = dir.path().join("out");
        let config = RunConfig::from_args(SieveArgs {
            sizes: vec![10],
            workers: 1,
            trials: 1,
            output_dir: nested.clone(),
            threshold: 10_000,
            quiet: true,
            verbose: false,
        })
        .unwrap();

        run_experiments(&ReferenceRunner, &config).unwrap();
        assert!(nested.is_dir());
    }
}
