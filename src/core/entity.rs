//! Entity identification.
//!
//! Players and card instances share one id space so that a target list can
//! mix both:
//! - `0` and `1`: the two players
//! - `2..`: card instances, allocated by the match in creation order
//!
//! ```
//! use duel_engine::core::{EntityId, PlayerId};
//!
//! let p1 = EntityId::player(PlayerId::new(1));
//! assert!(p1.is_player());
//! assert_eq!(p1.as_player(), Some(PlayerId::new(1)));
//!
//! let card = EntityId(7);
//! assert!(!card.is_player());
//! assert_eq!(card.as_player(), None);
//! ```

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PLAYER_COUNT};

/// Unique identifier for a player or a card instance within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First id handed out to card instances.
    pub const FIRST_CARD: u32 = PLAYER_COUNT as u32;

    /// Entity id of a player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.0 as u32)
    }

    /// Does this id name a player?
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 < Self::FIRST_CARD
    }

    /// The player this id names, if any.
    #[must_use]
    pub fn as_player(self) -> Option<PlayerId> {
        self.is_player().then(|| PlayerId::new(self.0 as u8))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for EntityId {
    fn from(id: PlayerId) -> Self {
        Self::player(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_player() {
            Some(p) => write!(f, "{}", p),
            None => write!(f, "#{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids() {
        assert_eq!(EntityId::player(PlayerId::new(0)), EntityId(0));
        assert_eq!(EntityId::player(PlayerId::new(1)), EntityId(1));
        assert!(EntityId(1).is_player());
        assert!(!EntityId(2).is_player());
    }

    #[test]
    fn test_as_player() {
        assert_eq!(EntityId(0).as_player(), Some(PlayerId::new(0)));
        assert_eq!(EntityId(2).as_player(), None);
        assert_eq!(EntityId(100).as_player(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "#42");
        assert_eq!(format!("{}", EntityId(1)), "Player 1");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
