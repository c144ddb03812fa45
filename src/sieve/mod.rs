//! The distributed segmented sieve
//!
//! Pipeline, run identically on every rank of the group:
//! 1. the coordinator generates base primes up to sqrt(N + 1)
//! 2. the base primes are broadcast to every rank
//! 3. each rank deterministically takes its segment of [2, N + 1)
//! 4. each rank marks composites in its segment using the base primes
//! 5. counts (and, for small N, prime values) are reduced/gathered at
//!    the coordinator
//! 6. phase timings are max-reduced and packaged into a measurement

pub mod base;
pub mod partition;
pub mod runner;
pub mod segment;
pub mod trial;

pub use base::{base_primes, sieve_upto};
pub use partition::Segment;
pub use runner::DistributedSieve;
pub use segment::{mark_segment, SegmentSieve};
pub use trial::run_trial;
