//! Client intents and the intent history.
//!
//! An `Intent` is one request a client submits: the "verb" plus whatever
//! entity ids or numbers it carries. Every intent the engine accepts is
//! appended to the match history as an `IntentRecord`, which is enough to
//! replay the match from its seed.
//!
//! ```
//! use duel_engine::core::{EntityId, Intent};
//!
//! let cast = Intent::Cast { card: EntityId(12) };
//! let target = Intent::select_target(&[EntityId(1)]);
//! assert_ne!(cast, target);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::phase::Phase;
use super::player::PlayerId;

/// Uid list carried by selection intents. Most selections name 1-4 cards.
pub type Uids = SmallVec<[EntityId; 4]>;

/// Where a peeked deck card goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckDestination {
    Top,
    Bottom,
    Hand,
    Graveyard,
}

/// One attacker aimed at one target (a player id or an opposing creature).
pub type AttackPair = (EntityId, EntityId);

/// A client request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Pass,
    Cast { card: EntityId },
    Activate { card: EntityId, ability: usize },
    SelectCost(Uids),
    SelectTarget(Uids),
    SelectTribute(Uids),
    SelectDeckDestinations(Vec<(EntityId, DeckDestination)>),
    SelectDiscard(Uids),
    MakeChoice(usize),
    SetX(i32),
    SetAmount(i32),
    AssignAttack(Vec<AttackPair>),
    UnassignAttack(Uids),
    SubmitAttack(Vec<AttackPair>),
    OrderTriggers(Vec<usize>),
    SetAutoStop(Option<Phase>),
    CancelNegotiation,
    DefaultDecision,
}

impl Intent {
    /// Target selection from a slice of ids.
    #[must_use]
    pub fn select_target(uids: &[EntityId]) -> Self {
        Self::SelectTarget(SmallVec::from_slice(uids))
    }

    /// Cost selection from a slice of ids.
    #[must_use]
    pub fn select_cost(uids: &[EntityId]) -> Self {
        Self::SelectCost(SmallVec::from_slice(uids))
    }

    /// Tribute selection from a slice of ids.
    #[must_use]
    pub fn select_tribute(uids: &[EntityId]) -> Self {
        Self::SelectTribute(SmallVec::from_slice(uids))
    }

    /// Discard selection from a slice of ids.
    #[must_use]
    pub fn select_discard(uids: &[EntityId]) -> Self {
        Self::SelectDiscard(SmallVec::from_slice(uids))
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Pass => "pass",
            Intent::Cast { .. } => "cast",
            Intent::Activate { .. } => "activate",
            Intent::SelectCost(_) => "select_cost",
            Intent::SelectTarget(_) => "select_target",
            Intent::SelectTribute(_) => "select_tribute",
            Intent::SelectDeckDestinations(_) => "select_deck_destinations",
            Intent::SelectDiscard(_) => "select_discard",
            Intent::MakeChoice(_) => "make_choice",
            Intent::SetX(_) => "set_x",
            Intent::SetAmount(_) => "set_amount",
            Intent::AssignAttack(_) => "assign_attack",
            Intent::UnassignAttack(_) => "unassign_attack",
            Intent::SubmitAttack(_) => "submit_attack",
            Intent::OrderTriggers(_) => "order_triggers",
            Intent::SetAutoStop(_) => "set_auto_stop",
            Intent::CancelNegotiation => "cancel_negotiation",
            Intent::DefaultDecision => "default_decision",
        }
    }
}

/// An accepted intent with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// The player who submitted the intent.
    pub player: PlayerId,

    /// The intent itself.
    pub intent: Intent,

    /// Turn number when it was accepted.
    pub turn: u32,

    /// Position in the match-wide history.
    pub sequence: u32,
}

impl IntentRecord {
    #[must_use]
    pub fn new(player: PlayerId, intent: Intent, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            intent,
            turn,
            sequence,
        }
    }
}
