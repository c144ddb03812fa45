//! Configuration types for amdahl-sieve
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//!
//! Argument validation happens before the worker group is spawned, so a
//! malformed invocation terminates the whole program with a non-zero exit
//! status and no partial results.

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Default bound below which explicit prime values are collected
pub const DEFAULT_VALUE_THRESHOLD: u64 = 10_000;

/// Distributed segmented sieve benchmark with Amdahl speedup analysis
#[derive(Parser, Debug, Clone)]
#[command(
    name = "amdahl-sieve",
    version,
    about = "Distributed segmented sieve benchmark with Amdahl speedup analysis",
    long_about = "Computes all primes up to each requested bound with a segmented Sieve of\n\
                  Eratosthenes spread across a fixed group of worker ranks, timing the\n\
                  sequential phase (base-prime generation and distribution) against the\n\
                  parallel phase (segment marking and aggregation) over repeated trials\n\
                  to estimate the theoretical maximum speedup via Amdahl's law.",
    after_help = "EXAMPLES:\n    \
        amdahl-sieve 1000 100000\n    \
        amdahl-sieve 100000 -w 8 -t 10\n    \
        amdahl-sieve 5000 --threshold 5000 -o results\n    \
        amdahl-sieve 1000000 -w 4 -q  # quiet mode, reports only"
)]
pub struct SieveArgs {
    /// Sieve bounds to benchmark (one experiment per size)
    #[arg(value_name = "SIZE", required = true, num_args = 1..)]
    pub sizes: Vec<u64>,

    /// Number of worker ranks in the group
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Repeated trials per size (timings are averaged)
    #[arg(short = 't', long, default_value = "5", value_name = "NUM")]
    pub trials: usize,

    /// Directory for the CSV and text reports
    #[arg(short = 'o', long, default_value = "results", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Collect explicit prime values only for sizes up to this bound
    #[arg(long, default_value_t = DEFAULT_VALUE_THRESHOLD, value_name = "N")]
    pub threshold: u64,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Sieve bounds to benchmark
    pub sizes: Vec<u64>,

    /// Number of worker ranks
    pub worker_count: usize,

    /// Trials per size
    pub trials: usize,

    /// Report output directory
    pub output_dir: PathBuf,

    /// Prime values are gathered only for sizes at or below this bound
    pub value_threshold: u64,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: SieveArgs) -> Result<Self, ConfigError> {
        if args.sizes.is_empty() {
            return Err(ConfigError::NoSizes);
        }

        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                got: args.workers,
                max: MAX_WORKERS,
            });
        }

        if args.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }

        Ok(Self {
            sizes: args.sizes,
            worker_count: args.workers,
            trials: args.trials,
            output_dir: args.output_dir,
            value_threshold: args.threshold,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Default worker count: one rank per available core
fn default_workers() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> SieveArgs {
        SieveArgs {
            sizes: vec![1000],
            workers: 4,
            trials: 5,
            output_dir: PathBuf::from("results"),
            threshold: DEFAULT_VALUE_THRESHOLD,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = RunConfig::from_args(base_args()).unwrap();
        assert_eq!(config.sizes, vec![1000]);
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.trials, 5);
        assert!(config.show_progress);
    }

    #[test]
    fn test_empty_sizes_rejected() {
        let mut args = base_args();
        args.sizes.clear();
        assert_eq!(RunConfig::from_args(args), Err(ConfigError::NoSizes));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut args = base_args();
        args.workers = 0;
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidWorkerCount { got: 0, .. })
        ));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let mut args = base_args();
        args.trials = 0;
        assert_eq!(RunConfig::from_args(args), Err(ConfigError::ZeroTrials));
    }

    #[test]
    fn test_quiet_disables_progress() {
        let mut args = base_args();
        args.quiet = true;
        let config = RunConfig::from_args(args).unwrap();
        assert!(!config.show_progress);
    }
}
