//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` tracks which player's zone list holds each card and
//! keeps every list in order. It supports:
//! - Explicit position control for ordered lists (deck top, bottom, index)
//! - Atomic remove-then-add moves, including moves across players
//! - Card lookup by entity ID
//! - Controller derivation from list membership

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::Zone;
use crate::core::{EntityId, MatchRng, PlayerId};
use crate::error::{EngineError, Result};

/// Position for inserting a card into a zone list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// End of the list. For decks this is the top.
    Top,
    /// Start of the list.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// Manages card locations across both players' zones.
///
/// ## Usage
///
/// ```
/// use duel_engine::core::{EntityId, PlayerId};
/// use duel_engine::zones::{Zone, ZoneManager, ZonePosition};
///
/// let p0 = PlayerId::new(0);
/// let mut zones = ZoneManager::new();
/// zones.add(EntityId(10), p0, Zone::Deck, ZonePosition::Top).unwrap();
/// zones.add(EntityId(11), p0, Zone::Deck, ZonePosition::Top).unwrap();
///
/// assert_eq!(zones.top(p0, Zone::Deck), Some(EntityId(11)));
/// zones.move_to(EntityId(11), p0, Zone::Hand, ZonePosition::Top).unwrap();
/// assert_eq!(zones.location(EntityId(11)), Some((p0, Zone::Hand)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Card locations: entity_id -> (list holder, zone)
    locations: FxHashMap<EntityId, (PlayerId, Zone)>,

    /// Ordered card lists, bottom first.
    lists: FxHashMap<(PlayerId, Zone), Vec<EntityId>>,
}

fn insert_at(list: &mut Vec<EntityId>, entity: EntityId, position: ZonePosition) {
    match position {
        ZonePosition::Top => list.push(entity),
        ZonePosition::Bottom => list.insert(0, entity),
        ZonePosition::Index(i) => {
            let idx = i.min(list.len());
            list.insert(idx, entity);
        }
    }
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a card that is not yet tracked.
    pub fn add(
        &mut self,
        entity: EntityId,
        player: PlayerId,
        zone: Zone,
        position: ZonePosition,
    ) -> Result<()> {
        if self.locations.contains_key(&entity) {
            return Err(EngineError::invariant(format!(
                "{} already tracked by the zone manager",
                entity
            )));
        }

        self.locations.insert(entity, (player, zone));
        insert_at(self.lists.entry((player, zone)).or_default(), entity, position);
        Ok(())
    }

    /// Move a card into `player`'s `zone`, removing it from wherever it was.
    ///
    /// Returns the previous location. Moving to the current location still
    /// repositions the card within its list.
    pub fn move_to(
        &mut self,
        entity: EntityId,
        player: PlayerId,
        zone: Zone,
        position: ZonePosition,
    ) -> Result<(PlayerId, Zone)> {
        let old = self
            .locations
            .get(&entity)
            .copied()
            .ok_or_else(|| EngineError::invariant(format!("{} has no zone", entity)))?;

        if let Some(list) = self.lists.get_mut(&old) {
            list.retain(|&e| e != entity);
        }

        self.locations.insert(entity, (player, zone));
        insert_at(self.lists.entry((player, zone)).or_default(), entity, position);

        Ok(old)
    }

    /// Get the (holder, zone) of a card.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<(PlayerId, Zone)> {
        self.locations.get(&entity).copied()
    }

    /// Get the zone a card is in.
    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<Zone> {
        self.location(entity).map(|(_, z)| z)
    }

    /// The player whose list holds the card.
    #[must_use]
    pub fn controller(&self, entity: EntityId) -> Option<PlayerId> {
        self.location(entity).map(|(p, _)| p)
    }

    /// Check if a card is in a specific zone (of either player).
    #[must_use]
    pub fn is_in(&self, entity: EntityId, zone: Zone) -> bool {
        self.zone_of(entity) == Some(zone)
    }

    /// Is the card in play or in the token zone?
    #[must_use]
    pub fn on_board(&self, entity: EntityId) -> bool {
        self.zone_of(entity).map_or(false, Zone::is_board)
    }

    /// Cards in one list, bottom first.
    #[must_use]
    pub fn cards(&self, player: PlayerId, zone: Zone) -> &[EntityId] {
        self.lists.get(&(player, zone)).map_or(&[], |v| v.as_slice())
    }

    /// Number of cards in one list.
    #[must_use]
    pub fn size(&self, player: PlayerId, zone: Zone) -> usize {
        self.cards(player, zone).len()
    }

    /// Top card of a list (last in the vec).
    #[must_use]
    pub fn top(&self, player: PlayerId, zone: Zone) -> Option<EntityId> {
        self.cards(player, zone).last().copied()
    }

    /// Up to `n` cards from the top, topmost first.
    #[must_use]
    pub fn top_n(&self, player: PlayerId, zone: Zone, n: usize) -> Vec<EntityId> {
        self.cards(player, zone).iter().rev().take(n).copied().collect()
    }

    /// A player's board: play then tokens.
    pub fn board(&self, player: PlayerId) -> impl Iterator<Item = EntityId> + '_ {
        self.cards(player, Zone::Play)
            .iter()
            .chain(self.cards(player, Zone::Tokens).iter())
            .copied()
    }

    /// Both boards, `first` player's board first.
    pub fn both_boards(&self, first: PlayerId) -> impl Iterator<Item = EntityId> + '_ {
        self.board(first).chain(self.board(first.opponent()))
    }

    /// Shuffle one list.
    pub fn shuffle(&mut self, player: PlayerId, zone: Zone, rng: &mut MatchRng) {
        if let Some(list) = self.lists.get_mut(&(player, zone)) {
            rng.shuffle(list);
        }
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Check if the manager tracks an entity.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.locations.contains_key(&entity)
    }
}
