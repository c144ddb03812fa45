//! Error types for amdahl-sieve
//!
//! Error hierarchy covering:
//! - Configuration and argument validation errors
//! - Collective-communication errors between worker ranks
//! - Report-writing errors
//!
//! There is no recoverable category: every error aborts the whole run
//! before any partial results are reported.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for amdahl-sieve
#[derive(Error, Debug)]
pub enum SieveError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Collective-communication errors
    #[error("Communication error: {0}")]
    Comm(#[from] CommError),

    /// Report-writing errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Startup-argument and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No sieve sizes were supplied
    #[error("no sieve sizes were given")]
    NoSizes,

    /// Worker count outside the supported range
    #[error("worker count must be between 1 and {max}, got {got}")]
    InvalidWorkerCount { got: usize, max: usize },

    /// Zero trials requested
    #[error("trial count must be at least 1")]
    ZeroTrials,
}

/// Errors raised by the collective-communication layer
#[derive(Error, Debug)]
pub enum CommError {
    /// A peer rank dropped its endpoint mid-collective
    #[error("rank {rank}: collective peer disconnected")]
    Disconnected { rank: usize },

    /// A collective received a frame that violates the protocol
    #[error("rank {rank}: collective protocol violation: {detail}")]
    Protocol { rank: usize, detail: String },

    /// Worker thread could not be spawned
    #[error("failed to spawn worker thread for rank {rank}: {reason}")]
    SpawnFailed { rank: usize, reason: String },

    /// A worker group needs at least one rank
    #[error("worker group requires at least one rank")]
    EmptyGroup,
}

impl CommError {
    /// Build a protocol-violation error for the given rank
    pub fn protocol(rank: usize, detail: impl Into<String>) -> Self {
        CommError::Protocol {
            rank,
            detail: detail.into(),
        }
    }
}

/// Errors raised while writing CSV/text reports
#[derive(Error, Debug)]
pub enum ReportError {
    /// Output directory could not be created
    #[error("failed to create report directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A report file could not be written
    #[error("failed to write report file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience result type for the whole crate
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type for the communication layer
pub type CommResult<T> = std::result::Result<T, CommError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let comm_err = CommError::Disconnected { rank: 3 };
        let sieve_err: SieveError = comm_err.into();
        assert!(matches!(sieve_err, SieveError::Comm(_)));

        let config_err = ConfigError::NoSizes;
        let sieve_err: SieveError = config_err.into();
        assert!(matches!(sieve_err, SieveError::Config(_)));
    }

    #[test]
    fn test_protocol_helper() {
        let err = CommError::protocol(2, "unexpected frame");
        let msg = err.to_string();
        assert!(msg.contains("rank 2"));
        assert!(msg.contains("unexpected frame"));
    }
}
