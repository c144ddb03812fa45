//! amdahl-sieve - Distributed segmented sieve benchmark
//!
//! Computes all primes up to a bound N with a segmented Sieve of
//! Eratosthenes spread across a fixed group of worker ranks, and measures
//! how the wall time splits between a sequential phase and a parallel phase
//! to estimate the theoretical maximum speedup via Amdahl's law.
//!
//! # Architecture
//!
//! Every trial runs the identical pipeline on every rank of the group:
//!
//! 1. The coordinator (rank 0) generates the base primes up to sqrt(N + 1)
//! 2. The base primes are broadcast to all ranks (sequential phase ends)
//! 3. Each rank takes its deterministic segment of [2, N + 1) and marks
//!    composites locally using the base primes
//! 4. Prime counts are sum-reduced at the coordinator; for small N the
//!    prime values are gathered as well (parallel phase ends)
//! 5. Phase timings are max-reduced across ranks and packaged into a
//!    [`Measurement`]
//!
//! Ranks are threads communicating only through blocking collective calls
//! over channels; there is no shared memory between them. The harness
//! repeats trials per size and writes paired CSV/text reports.

pub mod comm;
pub mod config;
pub mod error;
pub mod harness;
pub mod measure;
pub mod progress;
pub mod report;
pub mod sieve;

pub use config::{RunConfig, SieveArgs};
pub use error::{Result, SieveError};
pub use harness::TrialRunner;
pub use measure::Measurement;
pub use sieve::DistributedSieve;
