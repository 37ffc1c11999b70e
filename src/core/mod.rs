//! Core types: entities, players, phases, intents, RNG, configuration.
//!
//! Everything else in the crate is built from these.

pub mod entity;
pub mod player;
pub mod phase;
pub mod rng;
pub mod config;
pub mod action;

use serde::{Deserialize, Serialize};

pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap, PlayerState, PLAYER_COUNT};
pub use phase::Phase;
pub use rng::MatchRng;
pub use config::MatchConfig;
pub use action::{AttackPair, DeckDestination, Intent, IntentRecord, Uids};

/// Identifier of a match inside a `MatchRegistry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match({})", self.0)
    }
}
