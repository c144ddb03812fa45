//! Trial measurements and Amdahl arithmetic
//!
//! A [`Measurement`] is created once per trial at the coordinator and is
//! immutable once returned; the reporting side derives the parallel
//! fraction and the theoretical maximum speedup (Amdahl's law) from it.

/// One trial's record, produced at the coordinator
///
/// Phase durations are the maximum local delta across all ranks of the
/// group, not the coordinator's own clock: a collective operation completes
/// only when its slowest participant finishes, so the coordinator's local
/// delta alone would understate the parallel-phase cost. (Observed variants
/// of this experiment disagree on this point; the max-reduction is the
/// faithful choice.)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Whole-trial wall time in microseconds
    pub total_us: u64,

    /// Sequential phase (base-prime generation + distribution) in microseconds
    pub sequential_us: u64,

    /// Parallel phase (partitioning + marking + aggregation) in microseconds
    pub parallel_us: u64,

    /// Global number of primes in [2, N]
    pub prime_count: u64,

    /// The primes themselves, ascending; populated only when N is at or
    /// below the collect-values threshold. Never assume its length equals
    /// `prime_count` — above the threshold it is deliberately empty.
    pub primes: Vec<u64>,

    /// Number of ranks that participated
    pub worker_count: usize,
}

impl Measurement {
    /// Fraction of total wall time spent in the parallel phase (0.0 ..= 1.0)
    pub fn parallel_fraction(&self) -> f64 {
        fraction(self.parallel_us as f64, self.total_us as f64)
    }

    /// Theoretical maximum speedup per Amdahl's law: 1 / (1 - p) for
    /// 0 < p < 1, otherwise 1.
    pub fn max_speedup(&self) -> f64 {
        speedup(self.parallel_fraction())
    }
}

/// Averages over all trials of one size
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSummary {
    /// The sieve bound
    pub size: u64,

    /// Number of trials averaged
    pub trials: usize,

    /// Mean total wall time in microseconds
    pub mean_total_us: f64,

    /// Mean parallel-phase time in microseconds
    pub mean_parallel_us: f64,

    /// Mean sequential-phase time in microseconds
    pub mean_sequential_us: f64,

    /// Prime count (identical across trials)
    pub prime_count: u64,

    /// Number of ranks
    pub worker_count: usize,
}

impl SizeSummary {
    /// Average the measurements of one size's trials.
    ///
    /// Counts and worker numbers are taken from the first trial; repeated
    /// trials with the same parameters produce identical counts.
    pub fn from_trials(size: u64, measurements: &[Measurement]) -> Self {
        let trials = measurements.len().max(1) as f64;
        let sum = |f: fn(&Measurement) -> u64| {
            measurements.iter().map(|m| f(m) as f64).sum::<f64>() / trials
        };

        Self {
            size,
            trials: measurements.len(),
            mean_total_us: sum(|m| m.total_us),
            mean_parallel_us: sum(|m| m.parallel_us),
            mean_sequential_us: sum(|m| m.sequential_us),
            prime_count: measurements.first().map_or(0, |m| m.prime_count),
            worker_count: measurements.first().map_or(0, |m| m.worker_count),
        }
    }

    /// Mean fraction of wall time spent in the parallel phase
    pub fn parallel_fraction(&self) -> f64 {
        fraction(self.mean_parallel_us, self.mean_total_us)
    }

    /// Theoretical maximum speedup for the mean parallel fraction
    pub fn max_speedup(&self) -> f64 {
        speedup(self.parallel_fraction())
    }
}

fn fraction(parallel: f64, total: f64) -> f64 {
    if parallel > 0.0 && total > 0.0 {
        parallel / total
    } else {
        0.0
    }
}

fn speedup(p: f64) -> f64 {
    if p > 0.0 && p < 1.0 {
        1.0 / (1.0 - p)
    } else {
        1.0
    }
}
