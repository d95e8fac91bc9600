//! Seeded randomness for a match.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random source owned by one match.
///
/// Certain outcomes (probability at or below 0, at or above 1, empty ranges)
/// return without drawing, so adding a guaranteed roll never shifts the
/// sequence seen by later rolls.
#[derive(Debug, Clone)]
pub struct MatchRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl MatchRng {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the generator was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// True with probability `p`.
    pub fn roll(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.inner.gen_bool(p)
        }
    }

    /// Uniform value in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.inner.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform index below `len`, or `None` when `len` is zero.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            1 => Some(0),
            _ => Some(self.inner.gen_range(0..len)),
        }
    }

    /// Pick a uniformly random element.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }
}

impl Default for MatchRng {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MatchRng::new(42);
        let mut b = MatchRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 1.0).to_bits(), b.uniform(0.0, 1.0).to_bits());
        }
    }

    #[test]
    fn test_certain_rolls_do_not_draw() {
        let mut a = MatchRng::new(7);
        let mut b = MatchRng::new(7);

        assert!(!a.roll(0.0));
        assert!(a.roll(1.0));
        assert!(!a.roll(-3.0));
        assert_eq!(a.index(1), Some(0));
        assert_eq!(a.index(0), None);

        assert_eq!(a.uniform(0.0, 1.0).to_bits(), b.uniform(0.0, 1.0).to_bits());
    }

    #[test]
    fn test_ranges() {
        let mut rng = MatchRng::new(1);
        for _ in 0..1000 {
            let v = rng.uniform(1.0, 1.17);
            assert!((1.0..1.17).contains(&v));
            assert!(rng.index(5).unwrap() < 5);
        }
        assert!((rng.uniform(2.0, 2.0) - 2.0).abs() < 1e-12);
    }
}
