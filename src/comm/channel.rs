//! Channel-backed worker group
//!
//! Ranks are OS threads connected in a hub topology rooted at rank 0: each
//! worker holds one duplex pair of bounded crossbeam channels to the
//! coordinator, and every collective moves frames through that hub. Channels
//! are rebuilt for every [`ProcessGroup::run`] call, so nothing is shared
//! across trials.
//!
//! Dropping an endpoint disconnects its links, which unblocks every peer
//! with a `Disconnected` error; a failed rank therefore takes the whole
//! group down instead of leaving it stalled.

use crate::comm::{Communicator, ReduceOp, ROOT};
use crate::error::{CommError, CommResult};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread;

/// Link capacity; collectives are rendezvous-style, one frame in flight
const LINK_CAPACITY: usize = 1;

/// A single message on a rank-to-rank link
#[derive(Debug, Clone)]
enum Frame {
    Scalar(u64),
    Values(Vec<u64>),
}

/// Coordinator-side duplex link to one worker rank
struct RootLink {
    tx: Sender<Frame>,
    rx: Receiver<Frame>,
}

enum Endpoint {
    /// Rank 0: one link per worker, indexed by rank - 1
    Root { links: Vec<RootLink> },

    /// Any other rank: duplex pair to the coordinator
    Worker {
        to_root: Sender<Frame>,
        from_root: Receiver<Frame>,
    },
}

/// One rank's endpoint into the group
pub struct ChannelCommunicator {
    rank: usize,
    world_size: usize,
    endpoint: Endpoint,
}

impl ChannelCommunicator {
    fn disconnected(&self) -> CommError {
        CommError::Disconnected { rank: self.rank }
    }

    fn protocol(&self, detail: impl Into<String>) -> CommError {
        CommError::protocol(self.rank, detail)
    }
}

impl Communicator for ChannelCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.world_size
    }

    fn broadcast_scalar(&self, value: Option<u64>) -> CommResult<u64> {
        match &self.endpoint {
            Endpoint::Root { links } => {
                let value =
                    value.ok_or_else(|| self.protocol("broadcast without a value on the root"))?;
                for link in links {
                    link.tx
                        .send(Frame::Scalar(value))
                        .map_err(|_| self.disconnected())?;
                }
                Ok(value)
            }
            Endpoint::Worker { from_root, .. } => {
                if value.is_some() {
                    return Err(self.protocol("broadcast value supplied on a non-root rank"));
                }
                match from_root.recv() {
                    Ok(Frame::Scalar(v)) => Ok(v),
                    Ok(Frame::Values(_)) => Err(self.protocol("expected a scalar broadcast frame")),
                    Err(_) => Err(self.disconnected()),
                }
            }
        }
    }

    fn broadcast_values(&self, values: Option<Vec<u64>>) -> CommResult<Vec<u64>> {
        match &self.endpoint {
            Endpoint::Root { links } => {
                let values =
                    values.ok_or_else(|| self.protocol("broadcast without data on the root"))?;
                for link in links {
                    link.tx
                        .send(Frame::Values(values.clone()))
                        .map_err(|_| self.disconnected())?;
                }
                Ok(values)
            }
            Endpoint::Worker { from_root, .. } => {
                if values.is_some() {
                    return Err(self.protocol("broadcast data supplied on a non-root rank"));
                }
                match from_root.recv() {
                    Ok(Frame::Values(v)) => Ok(v),
                    Ok(Frame::Scalar(_)) => Err(self.protocol("expected a data broadcast frame")),
                    Err(_) => Err(self.disconnected()),
                }
            }
        }
    }

    fn reduce(&self, value: u64, op: ReduceOp) -> CommResult<Option<u64>> {
        match &self.endpoint {
            Endpoint::Root { links } => {
                let mut combined = value;
                for link in links {
                    match link.rx.recv() {
                        Ok(Frame::Scalar(v)) => combined = op.apply(combined, v),
                        Ok(Frame::Values(_)) => {
                            return Err(self.protocol("expected a scalar reduction frame"))
                        }
                        Err(_) => return Err(self.disconnected()),
                    }
                }
                Ok(Some(combined))
            }
            Endpoint::Worker { to_root, .. } => {
                to_root
                    .send(Frame::Scalar(value))
                    .map_err(|_| self.disconnected())?;
                Ok(None)
            }
        }
    }

    fn gather_values(&self, local: &[u64]) -> CommResult<Option<Vec<u64>>> {
        match &self.endpoint {
            Endpoint::Root { links } => {
                // Lengths first, so the buffer can be sized up front. The
                // per-rank offsets are implied by receiving in rank order.
                let mut lengths = Vec::with_capacity(links.len());
                for link in links {
                    match link.rx.recv() {
                        Ok(Frame::Scalar(len)) => lengths.push(len),
                        Ok(Frame::Values(_)) => {
                            return Err(self.protocol("expected a length frame before gather data"))
                        }
                        Err(_) => return Err(self.disconnected()),
                    }
                }

                let total = local.len() as u64 + lengths.iter().sum::<u64>();
                let mut gathered = Vec::with_capacity(total as usize);
                gathered.extend_from_slice(local);

                for (link, &len) in links.iter().zip(&lengths) {
                    if len == 0 {
                        continue;
                    }
                    match link.rx.recv() {
                        Ok(Frame::Values(values)) if values.len() as u64 == len => {
                            gathered.extend(values)
                        }
                        Ok(Frame::Values(values)) => {
                            return Err(self.protocol(format!(
                                "gather delivered {} values where {} were announced",
                                values.len(),
                                len
                            )))
                        }
                        Ok(Frame::Scalar(_)) => {
                            return Err(self.protocol("expected a data frame in gather"))
                        }
                        Err(_) => return Err(self.disconnected()),
                    }
                }
                Ok(Some(gathered))
            }
            Endpoint::Worker { to_root, .. } => {
                to_root
                    .send(Frame::Scalar(local.len() as u64))
                    .map_err(|_| self.disconnected())?;
                if !local.is_empty() {
                    to_root
                        .send(Frame::Values(local.to_vec()))
                        .map_err(|_| self.disconnected())?;
                }
                Ok(None)
            }
        }
    }
}

/// A fixed-size group of worker ranks backed by threads
///
/// The group size is chosen once at construction. Each [`run`](Self::run)
/// call spawns one thread per non-root rank, executes the supplied closure
/// on every rank in lock-step (the coordinator runs on the calling thread),
/// and returns the per-rank results in rank order.
pub struct ProcessGroup {
    world_size: usize,
}

impl ProcessGroup {
    /// Create a group of `world_size` ranks
    pub fn new(world_size: usize) -> CommResult<Self> {
        if world_size == 0 {
            return Err(CommError::EmptyGroup);
        }
        Ok(Self { world_size })
    }

    /// Number of ranks in the group
    pub fn world_size(&self) -> usize {
        self.world_size
    }

    /// Build one endpoint per rank, coordinator first
    fn endpoints(&self) -> Vec<ChannelCommunicator> {
        let mut links = Vec::with_capacity(self.world_size - 1);
        let mut workers = Vec::with_capacity(self.world_size - 1);

        for rank in 1..self.world_size {
            let (root_tx, worker_rx) = bounded(LINK_CAPACITY);
            let (worker_tx, root_rx) = bounded(LINK_CAPACITY);
            links.push(RootLink {
                tx: root_tx,
                rx: root_rx,
            });
            workers.push(ChannelCommunicator {
                rank,
                world_size: self.world_size,
                endpoint: Endpoint::Worker {
                    to_root: worker_tx,
                    from_root: worker_rx,
                },
            });
        }

        let mut endpoints = Vec::with_capacity(self.world_size);
        endpoints.push(ChannelCommunicator {
            rank: ROOT,
            world_size: self.world_size,
            endpoint: Endpoint::Root { links },
        });
        endpoints.extend(workers);
        endpoints
    }

    /// Run `f` once on every rank and collect the results in rank order.
    ///
    /// The first error in rank order wins. If the coordinator fails early,
    /// dropping its endpoint disconnects every link and unblocks the
    /// remaining workers, so the group never stalls on a dead coordinator.
    pub fn run<T, E, F>(&self, f: F) -> Result<Vec<T>, E>
    where
        F: Fn(ChannelCommunicator) -> Result<T, E> + Sync,
        T: Send,
        E: Send + From<CommError>,
    {
        let mut endpoints = self.endpoints();
        let root = endpoints.remove(0);
        let f = &f;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(endpoints.len());
            for comm in endpoints {
                let rank = comm.rank();
                let handle = thread::Builder::new()
                    .name(format!("sieve-{}", rank))
                    .spawn_scoped(scope, move || f(comm))
                    .map_err(|e| {
                        E::from(CommError::SpawnFailed {
                            rank,
                            reason: e.to_string(),
                        })
                    })?;
                handles.push(handle);
            }

            let root_result = f(root);

            let mut results = Vec::with_capacity(self.world_size);
            results.push(root_result);
            for handle in handles {
                match handle.join() {
                    Ok(result) => results.push(result),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            results.into_iter().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reaches_every_rank() {
        let group = ProcessGroup::new(4).unwrap();
        let results = group
            .run(|comm| -> CommResult<u64> {
                comm.broadcast_scalar(comm.is_root().then_some(42))
            })
            .unwrap();
        assert_eq!(results, vec![42; 4]);
    }

    #[test]
    fn test_broadcast_values_identical_copies() {
        let group = ProcessGroup::new(3).unwrap();
        let results = group
            .run(|comm| -> CommResult<Vec<u64>> {
                comm.broadcast_values(comm.is_root().then(|| vec![2, 3, 5, 7]))
            })
            .unwrap();
        for values in results {
            assert_eq!(values, vec![2, 3, 5, 7]);
        }
    }

    #[test]
    fn test_reduce_sum_and_max() {
        let group = ProcessGroup::new(4).unwrap();
        let sums = group
            .run(|comm| -> CommResult<Option<u64>> {
                comm.reduce(comm.rank() as u64 + 1, ReduceOp::Sum)
            })
            .unwrap();
        assert_eq!(sums[0], Some(1 + 2 + 3 + 4));
        assert!(sums[1..].iter().all(Option::is_none));

        let maxes = group
            .run(|comm| -> CommResult<Option<u64>> {
                comm.reduce(10 * comm.rank() as u64, ReduceOp::Max)
            })
            .unwrap();
        assert_eq!(maxes[0], Some(30));
    }

    #[test]
    fn test_gather_preserves_rank_order() {
        let group = ProcessGroup::new(4).unwrap();
        // Rank r contributes r copies of r; rank 0 contributes nothing.
        let results = group
            .run(|comm| -> CommResult<Option<Vec<u64>>> {
                let local = vec![comm.rank() as u64; comm.rank()];
                comm.gather_values(&local)
            })
            .unwrap();
        assert_eq!(results[0], Some(vec![1, 2, 2, 3, 3, 3]));
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_gather_all_empty() {
        let group = ProcessGroup::new(3).unwrap();
        let results = group
            .run(|comm| -> CommResult<Option<Vec<u64>>> { comm.gather_values(&[]) })
            .unwrap();
        assert_eq!(results[0], Some(Vec::new()));
    }

    #[test]
    fn test_single_rank_group() {
        let group = ProcessGroup::new(1).unwrap();
        let results = group
            .run(|comm| -> CommResult<(u64, Option<u64>, Option<Vec<u64>>)> {
                let b = comm.broadcast_scalar(Some(7))?;
                let r = comm.reduce(9, ReduceOp::Sum)?;
                let g = comm.gather_values(&[1, 2])?;
                Ok((b, r, g))
            })
            .unwrap();
        assert_eq!(results, vec![(7, Some(9), Some(vec![1, 2]))]);
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(matches!(ProcessGroup::new(0), Err(CommError::EmptyGroup)));
    }

    #[test]
    fn test_worker_supplying_broadcast_value_is_a_protocol_error() {
        let group = ProcessGroup::new(2).unwrap();
        let outcome = group.run(|comm| -> CommResult<u64> {
            // Every rank wrongly claims to be the broadcast root.
            comm.broadcast_scalar(Some(comm.rank() as u64))
        });
        assert!(matches!(outcome, Err(CommError::Protocol { .. })));
    }
}
