//! Score generation for simulated matches.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Highest score a single game of bowling can produce.
pub const PERFECT_GAME: u32 = 300;

/// Source of simulated game scores.
///
/// The service draws from whatever source it was given, so tests swap
/// in a fixed one for deterministic outcomes.
pub trait ScoreSource: Send + Sync {
    /// Draw a pair of independent scores in `0..=300`.
    fn draw(&mut self) -> (u32, u32);
}

/// Uniformly random scores backed by a seedable RNG.
pub struct RandomScores {
    rng: StdRng,
}

impl RandomScores {
    /// Entropy-seeded source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible simulations.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomScores {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreSource for RandomScores {
    fn draw(&mut self) -> (u32, u32) {
        (
            self.rng.gen_range(0..=PERFECT_GAME),
            self.rng.gen_range(0..=PERFECT_GAME),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_bowling_range() {
        let mut source = RandomScores::seeded(42);
        for _ in 0..200 {
            let (s1, s2) = source.draw();
            assert!(s1 <= PERFECT_GAME);
            assert!(s2 <= PERFECT_GAME);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomScores::seeded(7);
        let mut b = RandomScores::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
