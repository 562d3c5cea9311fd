//! The single randomness source threaded through generation and AI decisions

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Seedable random source. Every random decision in the game goes through one
/// of these so a whole session can be replayed from its seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: StdRng,
    seed: Option<u64>,
}

impl GameRng {
    /// Create a deterministic generator from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Draw a seed from OS entropy so an unseeded run can still be replayed
    pub fn entropy_seed() -> u64 {
        rand::random()
    }

    /// The seed this generator was built from, if it was seeded explicitly
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Pick one element uniformly, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// `true` with probability `p` (clamped to 0..=1)
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Access the underlying generator for APIs that want an `Rng`
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.inner
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
