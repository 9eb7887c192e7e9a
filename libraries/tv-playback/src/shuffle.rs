//! Shuffle order generation
//!
//! The only place randomness enters the engine. Orders are permutations of
//! video indices; the generator owns its RNG so a seeded instance replays
//! the same orders.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniform Fisher-Yates shuffle of `eligible`, optionally pinning one index
///
/// If `pin` is present in the result it is moved to the front (remove then
/// insert at 0). A pin that is not eligible is ignored.
pub fn shuffle_indices<R: Rng + ?Sized>(
    eligible: &[usize],
    pin: Option<usize>,
    rng: &mut R,
) -> Vec<usize> {
    if eligible.is_empty() {
        return Vec::new();
    }

    let mut order = eligible.to_vec();
    order.shuffle(rng);

    if let Some(pin) = pin {
        if let Some(at) = order.iter().position(|&index| index == pin) {
            let pinned = order.remove(at);
            order.insert(0, pinned);
        }
    }

    order
}

/// Produces shuffle orders from an owned RNG
#[derive(Debug, Clone)]
pub struct ShuffleOrderGenerator {
    rng: StdRng,
}

impl ShuffleOrderGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Permutation of `eligible`, with `pin` first when it is eligible
    pub fn generate(&mut self, eligible: &[usize], pin: Option<usize>) -> Vec<usize> {
        shuffle_indices(eligible, pin, &mut self.rng)
    }

    /// Uniformly random element of `candidates`
    pub fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        candidates.choose(&mut self.rng).copied()
    }
}

impl Default for ShuffleOrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}
