//! A small seedable random source for stochastic rule selection (§4.E,
//! §9a). Wraps `rand::rngs::StdRng` rather than depending on it directly
//! everywhere, so the derivation engine has one narrow surface
//! (`next_unit`, `reseed`) instead of threading `rand::Rng` trait bounds
//! through its API.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct DerivationRng {
    inner: StdRng,
}

impl DerivationRng {
    pub fn new(seed: u64) -> Self {
        DerivationRng {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.inner = StdRng::seed_from_u64(seed);
    }

    /// Draws a value uniformly from `[0, 1)`, used to select among a
    /// stochastic rule's weighted alternatives.
    pub fn next_unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }
}

impl Default for DerivationRng {
    fn default() -> Self {
        DerivationRng::new(0)
    }
}
