//! Deterministic random number generation for episode setup.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for different purposes,
//!   derived with `FxHasher` so they are stable across toolchains
//!
//! ## Usage
//!
//! ```
//! use evo_arcade::core::SimRng;
//!
//! let rng = SimRng::new(42);
//!
//! // Target placement and obstacle heights draw from separate streams,
//! // so changing one never shifts the other.
//! let targets = rng.for_context("target");
//! let heights = rng.for_context("obstacle");
//! assert_ne!(targets.seed(), heights.seed());
//! ```

use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Random integer in `low..=high`.
    pub fn gen_inclusive(&mut self, low: i32, high: i32) -> i32 {
        self.inner.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_inclusive(0, 999), rng2.gen_inclusive(0, 999));
        }
    }

    #[test]
    fn test_context_is_deterministic() {
        let mut ctx1 = SimRng::new(7).for_context("target");
        let mut ctx2 = SimRng::new(7).for_context("target");
        assert_eq!(ctx1.seed(), ctx2.seed());

        for _ in 0..10 {
            assert_eq!(ctx1.gen_inclusive(0, 999), ctx2.gen_inclusive(0, 999));
        }
    }

    #[test]
    fn test_contexts_are_independent() {
        let base = SimRng::new(7);
        assert_ne!(base.for_context("target").seed(), base.for_context("obstacle").seed());
        assert_ne!(
            base.for_context("target").seed(),
            SimRng::new(8).for_context("target").seed()
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_context_seeds_are_pinned() {
        // Stream seeds must stay fixed across releases
        let base = SimRng::new(7);
        assert_eq!(base.for_context("target").seed(), 3_373_017_260_322_369_115);
        assert_eq!(base.for_context("obstacle").seed(), 14_480_232_307_953_515_230);
    }

    #[test]
    fn test_gen_inclusive_bounds() {
        let mut rng = SimRng::new(3);
        for _ in 0..500 {
            let v = rng.gen_inclusive(10, 12);
            assert!((10..=12).contains(&v));
        }
        assert_eq!(rng.gen_inclusive(5, 5), 5);
    }
}
