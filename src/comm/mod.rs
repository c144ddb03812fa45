//! Collective communication between worker ranks
//!
//! The sieve pipeline is written against the [`Communicator`] trait rather
//! than any ambient process-global rank/size state, so the same code runs
//! inside a real multi-rank group or single-rank in a unit test. Every
//! collective is rooted at rank 0 (the coordinator) and blocks until all
//! participants have reached the corresponding call; there are no
//! non-blocking variants.

mod channel;

pub use channel::{ChannelCommunicator, ProcessGroup};

use crate::error::CommResult;

/// Rank of the coordinator
pub const ROOT: usize = 0;

/// Combining operator for [`Communicator::reduce`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Sum of all contributions
    Sum,
    /// Maximum of all contributions
    Max,
}

impl ReduceOp {
    /// Combine two contributions
    pub fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            ReduceOp::Sum => a + b,
            ReduceOp::Max => a.max(b),
        }
    }
}

/// Collective operations over a fixed group of ranks
///
/// All methods are synchronization points: a rank calling one blocks until
/// every rank in the group has reached the matching call. A disconnected or
/// misbehaving peer surfaces as a [`CommError`](crate::error::CommError) and
/// the computation is undefined past that point; callers must abort, never
/// continue with partial state.
pub trait Communicator {
    /// Rank of this participant (0-indexed)
    fn rank(&self) -> usize;

    /// Total number of ranks in the group
    fn world_size(&self) -> usize;

    /// Whether this rank is the coordinator
    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }

    /// Broadcast one scalar from the coordinator to every rank.
    ///
    /// The coordinator supplies `Some(value)`, every other rank `None`;
    /// all ranks return the coordinator's value.
    fn broadcast_scalar(&self, value: Option<u64>) -> CommResult<u64>;

    /// Broadcast a value sequence from the coordinator to every rank.
    ///
    /// Same root asymmetry as [`broadcast_scalar`](Self::broadcast_scalar).
    /// After this call every rank holds an identical copy.
    fn broadcast_values(&self, values: Option<Vec<u64>>) -> CommResult<Vec<u64>>;

    /// Reduce one scalar per rank into a single value at the coordinator.
    ///
    /// Returns `Some(combined)` on the coordinator and `None` elsewhere.
    fn reduce(&self, value: u64, op: ReduceOp) -> CommResult<Option<u64>>;

    /// Variable-length gather of per-rank value lists at the coordinator.
    ///
    /// Lengths travel first so the coordinator can size its buffer before
    /// any data moves; a rank contributing zero values sends no data frame.
    /// The coordinator receives the concatenation in rank order and returns
    /// `Some(gathered)`; every other rank returns `None`.
    fn gather_values(&self, local: &[u64]) -> CommResult<Option<Vec<u64>>>;
}
