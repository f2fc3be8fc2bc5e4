//! Seedable RNG resource for procedural track generation.
//!
//! Wraps `ChaCha8Rng` so generation can be reproduced from a seed. Systems
//! that need randomness take `ResMut<GameRng>` and use `rng.0` (which
//! implements `rand::Rng`); tests construct their own seeded instance and
//! assert exact output.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

#[derive(Resource)]
pub struct GameRng(pub ChaCha8Rng);

impl Default for GameRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl GameRng {
    /// Create a new `GameRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Reseed from OS entropy and return the seed so a run can be logged
    /// and reproduced later.
    pub fn reseed_from_entropy(&mut self) -> u64 {
        let seed: u64 = rand::random();
        self.0 = ChaCha8Rng::seed_from_u64(seed);
        seed
    }
}
