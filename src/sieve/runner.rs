//! The distributed trial runner
//!
//! [`DistributedSieve`] owns a fixed-size worker group and implements
//! [`TrialRunner`] by running the per-rank pipeline on every rank and
//! returning the coordinator's record. The group size is chosen once at
//! construction; channels and segment buffers are fresh for every trial.

use crate::comm::{ProcessGroup, ROOT};
use crate::error::{CommError, Result};
use crate::harness::TrialRunner;
use crate::measure::Measurement;
use crate::sieve::trial;

/// Runs sieve trials over a fixed group of worker ranks
pub struct DistributedSieve {
    group: ProcessGroup,
    value_threshold: u64,
}

impl DistributedSieve {
    /// Create a runner with `worker_count` ranks.
    ///
    /// Prime values are collected only for bounds up to `value_threshold`.
    pub fn new(worker_count: usize, value_threshold: u64) -> Result<Self> {
        Ok(Self {
            group: ProcessGroup::new(worker_count)?,
            value_threshold,
        })
    }

    /// Bound at or below which explicit prime values are gathered
    pub fn value_threshold(&self) -> u64 {
        self.value_threshold
    }
}

impl TrialRunner for DistributedSieve {
    fn worker_count(&self) -> usize {
        self.group.world_size()
    }

    fn run_trial(&self, n: u64) -> Result<Measurement> {
        let records = self
            .group
            .run(|comm| trial::run_trial(n, self.value_threshold, &comm))?;

        // Rank order puts the coordinator's record first; it is the only
        // meaningful one.
        let record = records.into_iter().next().flatten().ok_or_else(|| {
            CommError::protocol(ROOT, "coordinator produced no measurement record")
        })?;
        Ok(record)
    }
}
