//! Zone system for card locations.
//!
//! Each player owns one list per `Zone`. A card sits in exactly one list at a
//! time; the player whose list holds it is its controller.
//!
//! ## Key Types
//!
//! - `Zone`: The fixed set of zones
//! - `ZoneManager`: Card location tracking and movement
//! - `ZonePosition`: Position specifier for ordered lists

pub mod manager;

use serde::{Deserialize, Serialize};

pub use manager::{ZoneManager, ZonePosition};

/// Where a card can be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Play,
    Graveyard,
    Exile,
    Stack,
    Tokens,
}

impl Zone {
    /// Play and the token zone together form a player's board.
    #[must_use]
    pub const fn is_board(self) -> bool {
        matches!(self, Zone::Play | Zone::Tokens)
    }
}
