//! Random seeds and generator configuration.

use std::fmt;

/// Splittable random seed for deterministic fixture generation.
///
/// Seeds are plain values: every draw returns the value together with the
/// advanced seed, so the same starting seed always replays the same fixture
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Split a seed into two independent seeds.
    /// Uses SplitMix64 splitting strategy for independence.
    pub fn split(self) -> (Self, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        let new_gamma = mix_gamma(output);

        (Seed(new_state, gamma), Seed(output, new_gamma))
    }

    /// Generate the next random value and advance the seed.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a bounded random value in `[0, bound)`.
    ///
    /// A zero bound yields zero.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (value, new_seed) = self.next_u64();
        (((value as u128 * bound as u128) >> 64) as u64, new_seed)
    }

    /// Generate a random integer in the inclusive range `[min, max]`.
    ///
    /// Reversed bounds are swapped rather than rejected.
    pub fn next_in_range(self, min: i64, max: i64) -> (i64, Self) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi as i128 - lo as i128 + 1) as u128;
        if span > u64::MAX as u128 {
            let (value, new_seed) = self.next_u64();
            return (value as i64, new_seed);
        }
        let (offset, new_seed) = self.next_bounded(span as u64);
        ((lo as i128 + offset as i128) as i64, new_seed)
    }

    /// Generate a random `usize` in the inclusive range `[min, max]`.
    pub fn next_usize_in_range(self, min: usize, max: usize) -> (usize, Self) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let (offset, new_seed) = self.next_bounded((hi - lo) as u64 + 1);
        (lo + offset as usize, new_seed)
    }

    /// Generate a fraction in the closed interval `[0, 1]`.
    pub fn next_unit_f64(self) -> (f64, Self) {
        let (value, new_seed) = self.next_u64();
        let max = ((1u64 << 53) - 1) as f64;
        ((value >> 11) as f64 / max, new_seed)
    }

    /// Generate a random seed.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed(rng.gen(), rng.gen())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.0, self.1)
    }
}

/// Configuration for value generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Largest random offset added to `MIN` when a string has no `MAX`.
    pub unbounded_length_span: usize,

    /// Largest random offset added to `MIN` when a number has no `MAX`.
    pub unbounded_integer_span: i64,

    /// Attempts allowed to the uniqueness loop, at least one; `None` retries
    /// forever.
    pub retry_limit: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            unbounded_length_span: 200,
            unbounded_integer_span: i32::MAX as i64,
            retry_limit: None,
        }
    }
}

impl GeneratorConfig {
    /// Use the given offset bound for strings without `MAX`.
    pub fn with_unbounded_length_span(mut self, span: usize) -> Self {
        self.unbounded_length_span = span;
        self
    }

    /// Use the given offset bound for numbers without `MAX`.
    pub fn with_unbounded_integer_span(mut self, span: i64) -> Self {
        self.unbounded_integer_span = span.max(1);
        self
    }

    /// Give up the uniqueness loop after `attempts` generated values.
    ///
    /// At least one value is always tried, so a limit of 0 acts as 1.
    pub fn with_retry_limit(mut self, attempts: usize) -> Self {
        self.retry_limit = Some(attempts.max(1));
        self
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64 splitting.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
