//! The per-rank trial pipeline
//!
//! Every rank executes the identical sequence so the collective calls stay
//! symmetric; only the coordinator's measurement is meaningful and every
//! other rank returns `None`.
//!
//! Two phases are timed per trial:
//! - sequential: base-prime generation on the coordinator plus distribution
//! - parallel: partitioning, segment marking and aggregation
//!
//! A collective completes only when its slowest participant arrives, so the
//! recorded phase durations are the maximum local delta across all ranks,
//! obtained with a max-reduction, rather than the coordinator's own clock.

use crate::comm::{Communicator, ReduceOp};
use crate::error::{CommError, CommResult};
use crate::measure::Measurement;
use crate::sieve::base::base_primes;
use crate::sieve::partition::Segment;
use crate::sieve::segment::mark_segment;
use std::time::Instant;
use tracing::debug;

/// Run one sieve trial for bound `n` on this rank.
///
/// Prime values are gathered only when `n <= value_threshold`; above it the
/// returned value list is empty while the count stays exact. Safe for
/// `n = 0` and `n = 1` (no primes). Returns `Some(record)` on the
/// coordinator and `None` on every other rank.
pub fn run_trial<C: Communicator>(
    n: u64,
    value_threshold: u64,
    comm: &C,
) -> CommResult<Option<Measurement>> {
    let trial_start = Instant::now();

    // Sequential phase: generation on the coordinator, then distribution.
    // The count travels first; the data broadcast is skipped entirely when
    // the base set is empty, on every rank alike.
    let seq_start = Instant::now();
    let generated = comm.is_root().then(|| base_primes(n));
    let count = comm.broadcast_scalar(generated.as_ref().map(|b| b.len() as u64))?;
    let base = if count == 0 {
        Vec::new()
    } else {
        comm.broadcast_values(generated)?
    };
    if base.len() as u64 != count {
        return Err(CommError::protocol(
            comm.rank(),
            format!(
                "base-prime broadcast delivered {} of {} values",
                base.len(),
                count
            ),
        ));
    }
    let sequential = seq_start.elapsed();

    // Parallel phase: partition, mark, aggregate.
    let par_start = Instant::now();
    let segment = Segment::for_rank(n, comm.world_size(), comm.rank());
    let collect_values = n <= value_threshold;
    let local = mark_segment(&segment, &base, collect_values);
    debug!(
        rank = comm.rank(),
        lo = segment.lo,
        hi = segment.hi,
        local_count = local.count,
        "segment sieved"
    );

    let global_count = comm.reduce(local.count, ReduceOp::Sum)?;
    let gathered = if collect_values {
        comm.gather_values(&local.values)?
    } else {
        None
    };
    let parallel = par_start.elapsed();
    let total = trial_start.elapsed();

    // Phase times are max-reduced across the group; the extra reductions
    // themselves stay outside the measured window.
    let sequential_us = comm.reduce(sequential.as_micros() as u64, ReduceOp::Max)?;
    let parallel_us = comm.reduce(parallel.as_micros() as u64, ReduceOp::Max)?;
    let total_us = comm.reduce(total.as_micros() as u64, ReduceOp::Max)?;

    if !comm.is_root() {
        return Ok(None);
    }

    let at_root = |value: Option<u64>, what: &str| {
        value.ok_or_else(|| {
            CommError::protocol(
                comm.rank(),
                format!("{what} reduction returned nothing at the coordinator"),
            )
        })
    };

    Ok(Some(Measurement {
        total_us: at_root(total_us, "total-time")?,
        sequential_us: at_root(sequential_us, "sequential-time")?,
        parallel_us: at_root(parallel_us, "parallel-time")?,
        prime_count: at_root(global_count, "prime-count")?,
        primes: gathered.unwrap_or_default(),
        worker_count: comm.world_size(),
    }))
}
