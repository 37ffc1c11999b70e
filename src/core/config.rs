//! Match configuration.
//!
//! A match is configured once at creation. Every field has a tabletop
//! default, so most callers only override the seed:
//!
//! ```
//! use duel_engine::core::{MatchConfig, PlayerId};
//!
//! let config = MatchConfig::new(7)
//!     .with_starting_life(30)
//!     .with_first_player(PlayerId::new(1));
//!
//! assert_eq!(config.starting_life, 30);
//! assert_eq!(config.opening_hand, 5);
//! ```

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Rules parameters for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for every random decision in the match.
    pub seed: u64,

    /// Life each player starts with. Life is also the casting resource.
    pub starting_life: i32,

    /// Cards drawn into each hand before the first turn.
    pub opening_hand: usize,

    /// Hand size the active player must discard down to at end of turn.
    pub max_hand_size: usize,

    /// Cards drawn on entering the Draw phase.
    pub draw_per_turn: usize,

    /// Whether the first player skips the draw on turn 1.
    pub first_player_skips_draw: bool,

    /// Fixed first player. `None` flips a coin with the match RNG.
    pub first_player: Option<PlayerId>,
}

impl MatchConfig {
    /// Default rules with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    #[must_use]
    pub fn with_max_hand_size(mut self, cards: usize) -> Self {
        self.max_hand_size = cards;
        self
    }

    #[must_use]
    pub fn with_draw_per_turn(mut self, cards: usize) -> Self {
        self.draw_per_turn = cards;
        self
    }

    #[must_use]
    pub fn with_first_player_draw(mut self, draws: bool) -> Self {
        self.first_player_skips_draw = !draws;
        self
    }

    /// Fix who takes the first turn instead of flipping a coin.
    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = Some(player);
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_life: 20,
            opening_hand: 5,
            max_hand_size: 7,
            draw_per_turn: 1,
            first_player_skips_draw: true,
            first_player: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.starting_life, 20);
        assert_eq!(config.opening_hand, 5);
        assert_eq!(config.max_hand_size, 7);
        assert_eq!(config.draw_per_turn, 1);
        assert!(config.first_player_skips_draw);
        assert_eq!(config.first_player, None);
    }

    #[test]
    fn test_builder() {
        let config = MatchConfig::new(3)
            .with_opening_hand(0)
            .with_max_hand_size(2)
            .with_first_player_draw(true);

        assert_eq!(config.seed, 3);
        assert_eq!(config.opening_hand, 0);
        assert_eq!(config.max_hand_size, 2);
        assert!(!config.first_player_skips_draw);
    }

    #[test]
    fn test_serde() {
        let config = MatchConfig::new(11).with_first_player(PlayerId::new(1));
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
