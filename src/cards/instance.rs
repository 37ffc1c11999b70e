//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical card in a match. It carries the runtime
//! overlays that sit on top of the static definition: counters, damage,
//! combat flags, granted passives and abilities, and the values chosen
//! while casting it.
//!
//! The controller is not stored here. It is whichever player's zone list
//! holds the card; `last_controller` only caches it so triggers keyed on a
//! card leaving play can still be attributed after the move.

use serde::{Deserialize, Serialize};

use super::definition::{ActivatedAbility, CardId};
use crate::core::{EntityId, PlayerId};
use crate::passives::GrantedPassive;

/// A card instance in a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub uid: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Owner (whose deck it started in, or who created the token).
    pub owner: PlayerId,

    /// Created at runtime from the token table.
    pub token: bool,

    pub plus_counters: i32,
    pub minus_counters: i32,

    /// Damage marked this turn.
    pub damage: i32,

    pub summoning_sick: bool,
    pub exhausted: bool,

    /// Passives applied to this card by auras or effects.
    pub granted: Vec<GrantedPassive>,

    /// Abilities granted by effects, activated after the definition's own.
    pub granted_abilities: Vec<ActivatedAbility>,

    /// Modal option picked when the card was cast.
    pub chosen_mode: Option<usize>,

    /// X paid when the card was cast.
    pub x_value: i32,

    /// Controller at the time the card last left a board.
    pub last_controller: Option<PlayerId>,
}

impl CardInstance {
    /// Create a fresh instance owned by `owner`.
    #[must_use]
    pub fn new(uid: EntityId, card_id: CardId, owner: PlayerId) -> Self {
        Self {
            uid,
            card_id,
            owner,
            token: false,
            plus_counters: 0,
            minus_counters: 0,
            damage: 0,
            summoning_sick: false,
            exhausted: false,
            granted: Vec::new(),
            granted_abilities: Vec::new(),
            chosen_mode: None,
            x_value: 0,
            last_controller: None,
        }
    }

    /// Create a token instance.
    #[must_use]
    pub fn token(uid: EntityId, card_id: CardId, owner: PlayerId) -> Self {
        Self {
            token: true,
            ..Self::new(uid, card_id, owner)
        }
    }

    /// Net counter adjustment to attack and defense.
    #[must_use]
    pub fn counter_bonus(&self) -> i32 {
        self.plus_counters - self.minus_counters
    }

    /// Does the card hold a grant from `source` for aura slot `index`?
    #[must_use]
    pub fn has_grant_from(&self, source: EntityId, index: usize) -> bool {
        self.granted.iter().any(|g| g.is_aura_from(source, index))
    }

    /// Clear everything that should not survive leaving the board.
    pub fn reset_overlays(&mut self) {
        self.plus_counters = 0;
        self.minus_counters = 0;
        self.damage = 0;
        self.summoning_sick = false;
        self.exhausted = false;
        self.granted.clear();
        self.granted_abilities.clear();
        self.chosen_mode = None;
        self.x_value = 0;
    }
}
