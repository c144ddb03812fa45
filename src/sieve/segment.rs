//! Per-segment composite marking
//!
//! Each rank allocates one boolean per candidate in its segment, all
//! initialized "prime", and strikes out multiples of every base prime. The
//! buffer is freshly allocated per call and discarded once the local primes
//! are extracted.

use crate::sieve::partition::Segment;

/// Result of sieving one segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSieve {
    /// Positions still marked prime after marking
    pub count: u64,

    /// Local prime values in ascending order; empty unless collection was
    /// requested
    pub values: Vec<u64>,
}

/// Mark composites in `segment` using `base_primes` and count the survivors.
///
/// For each base prime `p` marking starts at the first multiple of `p`
/// inside the segment at or above `p * p`: any smaller multiple has a prime
/// factor below `p` and was already struck out by that smaller prime. All
/// bound and stride arithmetic stays in `u64`.
///
/// With `collect_values` set, the surviving values themselves are returned
/// alongside the count.
pub fn mark_segment(segment: &Segment, base_primes: &[u64], collect_values: bool) -> SegmentSieve {
    if segment.is_empty() {
        return SegmentSieve::default();
    }

    let mut is_prime = vec![true; segment.len() as usize];

    for &p in base_primes {
        let first_in_segment = segment.lo.div_ceil(p) * p;
        let start = first_in_segment.max(p * p);
        if start >= segment.hi {
            continue;
        }

        let mut multiple = start;
        while multiple < segment.hi {
            is_prime[(multiple - segment.lo) as usize] = false;
            multiple += p;
        }
    }

    let count = is_prime.iter().filter(|&&prime| prime).count() as u64;
    let values = if collect_values {
        is_prime
            .iter()
            .enumerate()
            .filter_map(|(offset, &prime)| prime.then(|| segment.lo + offset as u64))
            .collect()
    } else {
        Vec::new()
    };

    SegmentSieve { count, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::base::{base_primes, sieve_upto};

    fn segment(lo: u64, hi: u64) -> Segment {
        Segment { lo, hi }
    }

    #[test]
    fn test_empty_segment_is_valid_input() {
        let result = mark_segment(&segment(11, 11), &[2, 3], true);
        assert_eq!(result, SegmentSieve::default());
    }

    #[test]
    fn test_marks_full_range() {
        let result = mark_segment(&segment(2, 31), &base_primes(30), true);
        assert_eq!(result.count, 10);
        assert_eq!(result.values, sieve_upto(30));
    }

    #[test]
    fn test_base_primes_survive_their_own_marking() {
        // 2 and 3 sit inside the segment; marking starts at p * p, so the
        // primes themselves stay unmarked.
        let result = mark_segment(&segment(2, 10), &[2, 3], true);
        assert_eq!(result.values, vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_interior_segment() {
        let result = mark_segment(&segment(50, 70), &base_primes(100), true);
        assert_eq!(result.values, vec![53, 59, 61, 67]);
        assert_eq!(result.count, 4);
    }

    #[test]
    fn test_count_without_values() {
        let result = mark_segment(&segment(2, 101), &base_primes(100), false);
        assert_eq!(result.count, 25);
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_empty_base_set_leaves_everything_prime() {
        // N = 2: no base primes exist, the single candidate is prime.
        let result = mark_segment(&segment(2, 3), &[], true);
        assert_eq!(result.count, 1);
        assert_eq!(result.values, vec![2]);
    }
}
