//! Static range partitioning
//!
//! Divides the candidate range [2, N + 1) into one contiguous half-open
//! segment per rank. Pure arithmetic, no communication: every rank derives
//! its own segment from (N, world size, rank), so repeated runs with the
//! same parameters always partition identically.

/// A contiguous half-open range `[lo, hi)` of sieve candidates
///
/// Segments partition [2, N + 1) exactly: contiguous, ordered by rank,
/// pairwise disjoint, no gaps. A rank past the end of the range gets an
/// empty segment, which is valid zero-length input everywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First candidate in the segment
    pub lo: u64,

    /// One past the last candidate
    pub hi: u64,
}

impl Segment {
    /// The segment assigned to `rank` when sieving [2, N] over `world_size` ranks.
    ///
    /// Each segment spans ceil((N - 1) / world_size) integers, except the
    /// final one which may be shorter.
    pub fn for_rank(n: u64, world_size: usize, rank: usize) -> Self {
        debug_assert!(world_size > 0);
        debug_assert!(rank < world_size);

        // Number of candidates 2..=N; zero for N < 2.
        let span = n.saturating_sub(1);
        if span == 0 {
            return Self { lo: 2, hi: 2 };
        }

        let chunk = span.div_ceil(world_size as u64);
        let end = n + 1;
        let lo = (2 + rank as u64 * chunk).min(end);
        let hi = (lo + chunk).min(end);
        Self { lo, hi }
    }

    /// Number of candidates in the segment
    pub fn len(&self) -> u64 {
        self.hi - self.lo
    }

    /// Whether the segment holds no candidates
    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Segments must cover [2, N + 1) exactly, in rank order, with no
    /// overlaps and no gaps.
    fn assert_exact_partition(n: u64, world_size: usize) {
        let mut next = if n < 2 { None } else { Some(2u64) };
        for rank in 0..world_size {
            let seg = Segment::for_rank(n, world_size, rank);
            assert!(seg.lo <= seg.hi, "inverted segment for rank {}", rank);
            if let Some(expected_lo) = next {
                if !seg.is_empty() {
                    assert_eq!(seg.lo, expected_lo, "gap or overlap at rank {}", rank);
                    next = Some(seg.hi);
                }
            }
        }
        if n >= 2 {
            assert_eq!(next, Some(n + 1), "partition does not reach N + 1");
        }
    }

    #[test]
    fn test_partition_is_exact() {
        for &n in &[0u64, 1, 2, 3, 10, 30, 97, 100, 1_000, 10_007] {
            for world_size in 1..=8 {
                assert_exact_partition(n, world_size);
            }
        }
    }

    #[test]
    fn test_chunk_sizes_differ_only_at_the_tail() {
        let n = 100u64;
        let world_size = 7;
        let chunk = (n - 1).div_ceil(world_size as u64);
        for rank in 0..world_size {
            let seg = Segment::for_rank(n, world_size, rank);
            if rank + 1 < world_size {
                assert!(seg.len() == chunk || seg.is_empty());
            } else {
                assert!(seg.len() <= chunk);
            }
        }
    }

    #[test]
    fn test_more_ranks_than_candidates() {
        // N = 3 has two candidates (2 and 3); ranks 2 and 3 get nothing.
        let segs: Vec<_> = (0..4).map(|r| Segment::for_rank(3, 4, r)).collect();
        assert_eq!(segs[0], Segment { lo: 2, hi: 3 });
        assert_eq!(segs[1], Segment { lo: 3, hi: 4 });
        assert!(segs[2].is_empty());
        assert!(segs[3].is_empty());
    }

    #[test]
    fn test_degenerate_bounds() {
        assert!(Segment::for_rank(0, 4, 0).is_empty());
        assert!(Segment::for_rank(1, 4, 2).is_empty());
        // N = 2 is the single candidate 2.
        assert_eq!(Segment::for_rank(2, 1, 0), Segment { lo: 2, hi: 3 });
    }
}
