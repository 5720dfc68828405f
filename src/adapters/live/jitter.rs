//! Live adapter for the `JitterSource` port backed by a seedable RNG.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::JitterSource;

/// Uniform jitter from a [`StdRng`], seeded for reproducible runs.
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    /// Creates a jitter source from a seed, or from OS entropy when `None`.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng: Mutex::new(rng) }
    }
}

impl JitterSource for SeededJitter {
    fn jitter_ms(&self, ceiling_ms: u64) -> u64 {
        if ceiling_ms == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..ceiling_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_below_ceiling() {
        let jitter = SeededJitter::new(None);
        for _ in 0..1_000 {
            assert!(jitter.jitter_ms(1_000) < 1_000);
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = SeededJitter::new(Some(7));
        let b = SeededJitter::new(Some(7));
        let left: Vec<u64> = (0..10).map(|_| a.jitter_ms(1_000)).collect();
        let right: Vec<u64> = (0..10).map(|_| b.jitter_ms(1_000)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn zero_ceiling_gives_zero() {
        assert_eq!(SeededJitter::new(Some(1)).jitter_ms(0), 0);
    }
}
