//! Injectable random source
//!
//! Every random draw in the simulator (tool results, template choice, typing
//! jitter, activity ticks) goes through [`RandomSource`] so a session can be
//! replayed from a seed and tests can script exact values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource: Send {
    /// Uniform integer in `[low, high)`. `high` must be greater than `low`.
    fn range(&mut self, low: u64, high: u64) -> u64;

    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` items
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index into empty collection");
        #[allow(clippy::cast_possible_truncation)] // result < len
        let idx = self.range(0, len as u64) as usize;
        idx
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn range(&mut self, low: u64, high: u64) -> u64 {
        (**self).range(low, high)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn range(&mut self, low: u64, high: u64) -> u64 {
        (**self).range(low, high)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

/// Production random source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl RandomSource for StdRandom {
    fn range(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
