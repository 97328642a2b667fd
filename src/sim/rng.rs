//! Randomness sources
//!
//! Two flavors:
//! - `seeded_random`: stateless hash, used where values must be addressable by index
//! - `RngState`: seed + stream, expanded into a `Pcg32` for sequential draws

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Stream ids so that each subsystem draws from an independent sequence
pub const STREAM_CASCADE: u64 = 1;
pub const STREAM_CONFETTI: u64 = 2;
pub const STREAM_SMOKE: u64 = 3;

/// Spacing between per-particle hash seeds
pub const INDEX_SEED_STRIDE: f64 = 1234.5678;

/// Hash an arbitrary seed into [0, 1)
///
/// Same input always yields the same output on every platform.
#[inline]
pub fn seeded_random(seed: f64) -> f64 {
    let x = (seed * 12.9898).sin() * 43758.5453;
    let r = x - x.floor();
    // fract of a huge product can round up to exactly 1.0
    if r >= 1.0 { 0.0 } else { r }
}

/// Base hash seed for element `index` of a set created from `seed`
#[inline]
pub fn index_seed(seed: u64, index: usize) -> f64 {
    // Keep the magnitude small so sin() retains precision
    (seed % 10_000) as f64 + index as f64 * INDEX_SEED_STRIDE
}

/// Fresh non-deterministic seed
pub fn entropy_seed() -> u64 {
    rand::random::<u64>()
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        if self.stream == 0 {
            Pcg32::seed_from_u64(self.seed)
        } else {
            Pcg32::new(self.seed, self.stream)
        }
    }
}
