//! Player identification and per-player data.
//!
//! ## PlayerId
//!
//! A match always has exactly two players, `PlayerId(0)` and `PlayerId(1)`.
//!
//! ## PlayerMap
//!
//! Two-slot storage indexed by `PlayerId`.
//!
//! ## PlayerState
//!
//! Life, per-turn counters and player-scoped passives. Zone contents live in
//! the zone manager, keyed by player.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::entity::EntityId;
use super::phase::Phase;
use crate::passives::GrantedPassive;

/// Number of players in a match.
pub const PLAYER_COUNT: usize = 2;

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Both players, in seat order.
    pub const ALL: [PlayerId; PLAYER_COUNT] = [PlayerId(0), PlayerId(1)];

    /// Create a new player ID.
    ///
    /// Panics if `id` is not a valid seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < PLAYER_COUNT, "Only two players are supported");
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players, starting with `self`.
    ///
    /// ```
    /// use duel_engine::core::PlayerId;
    ///
    /// let order: Vec<_> = PlayerId::new(1).and_opponent().collect();
    /// assert_eq!(order, vec![PlayerId::new(1), PlayerId::new(0)]);
    /// ```
    pub fn and_opponent(self) -> impl Iterator<Item = PlayerId> {
        [self, self.opponent()].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use duel_engine::core::{PlayerId, PlayerMap};
///
/// let mut life: PlayerMap<i32> = PlayerMap::new(|_| 20);
/// life[PlayerId::new(1)] = 15;
/// assert_eq!(life[PlayerId::new(0)], 20);
/// assert_eq!(life[PlayerId::new(1)], 15);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Create a map from the two values in seat order.
    pub fn from_pair(first: T, second: T) -> Self {
        Self { data: [first, second] }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Mutable per-player match state.
#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    /// Life total. A player at or below zero loses.
    pub life: i32,

    /// Banked extra turns.
    pub extra_turns: u32,

    /// Phase this player asked the engine to stop at when fast-forwarding.
    pub auto_stop: Option<Phase>,

    /// Passives granted to the player (not to a card).
    pub granted: Vec<GrantedPassive>,

    /// Cards drawn this turn.
    pub cards_drawn_this_turn: u32,

    /// Cards cast this turn.
    pub cards_cast_this_turn: u32,

    /// (card, ability index) pairs activated this turn.
    pub abilities_used: FxHashSet<(EntityId, usize)>,

    /// Set when the player had to draw from an empty deck.
    pub decked: bool,
}

impl PlayerState {
    /// Fresh state with the given starting life.
    #[must_use]
    pub fn new(life: i32) -> Self {
        Self {
            life,
            ..Self::default()
        }
    }

    /// Reset the per-turn counters.
    pub fn reset_turn(&mut self) {
        self.cards_drawn_this_turn = 0;
        self.cards_cast_this_turn = 0;
        self.abilities_used.clear();
    }
}
