//! Base-prime generation
//!
//! A classical single-process Sieve of Eratosthenes over a boolean marker
//! array. [`base_primes`] produces the primes up to sqrt(N + 1), which are
//! sufficient to sieve the full range [2, N] segment by segment;
//! [`sieve_upto`] over the full bound doubles as the trusted reference
//! implementation the distributed result is tested against.

/// All primes up to and including `bound`, in ascending order.
///
/// Returns an empty vector for `bound < 2` without touching any index.
pub fn sieve_upto(bound: u64) -> Vec<u64> {
    if bound < 2 {
        return Vec::new();
    }

    let mut is_prime = vec![true; (bound + 1) as usize];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p: u64 = 2;
    while p * p <= bound {
        if is_prime[p as usize] {
            let mut multiple = p * p;
            while multiple <= bound {
                is_prime[multiple as usize] = false;
                multiple += p;
            }
        }
        p += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter_map(|(value, &prime)| prime.then_some(value as u64))
        .collect()
}

/// The base primes for sieving [2, N]: all primes up to sqrt(N + 1).
///
/// Generated only by the coordinator, then broadcast to every rank.
pub fn base_primes(n: u64) -> Vec<u64> {
    sieve_upto(isqrt(n.saturating_add(1)))
}

/// Integer square root: the largest `x` with `x * x <= n`
pub(crate) fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).is_some_and(|sq| sq <= n) {
        x += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sieve_small_bounds() {
        assert_eq!(sieve_upto(0), Vec::<u64>::new());
        assert_eq!(sieve_upto(1), Vec::<u64>::new());
        assert_eq!(sieve_upto(2), vec![2]);
        assert_eq!(sieve_upto(10), vec![2, 3, 5, 7]);
        assert_eq!(sieve_upto(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_known_prime_counts() {
        assert_eq!(sieve_upto(100).len(), 25);
        assert_eq!(sieve_upto(1_000).len(), 168);
        assert_eq!(sieve_upto(100_000).len(), 9_592);
    }

    #[test]
    fn test_base_primes_cover_sqrt() {
        // sqrt(101) ~ 10.05, so the base primes for N = 100 are those <= 10.
        assert_eq!(base_primes(100), vec![2, 3, 5, 7]);
        // limit < 2 yields an empty base set
        assert_eq!(base_primes(0), Vec::<u64>::new());
        assert_eq!(base_primes(1), Vec::<u64>::new());
        assert_eq!(base_primes(2), Vec::<u64>::new());
        // sqrt(4) = 2
        assert_eq!(base_primes(3), vec![2]);
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(u64::MAX), (1u64 << 32) - 1);
    }
}
