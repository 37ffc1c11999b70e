//! Deterministic per-match random number generation.
//!
//! Every random decision in a match (deck shuffles, random discards, the
//! coin flip for the first player) is drawn from one `MatchRng` seeded from
//! the match configuration. Replaying the same intents against the same seed
//! therefore reproduces the match exactly.
//!
//! ```
//! use duel_engine::core::MatchRng;
//!
//! let mut a = MatchRng::new(42);
//! let mut b = MatchRng::new(42);
//! assert_eq!(a.sample_indices(100, 3), b.sample_indices(100, 3));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 stream owned by one match.
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
}

impl MatchRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fair coin flip.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Pick `count` distinct indices out of `len`, in draw order.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let count = count.min(len);
        rand::seq::index::sample(&mut self.inner, len, count).into_vec()
    }
}
