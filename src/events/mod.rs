//! Client events.
//!
//! The engine never pushes state to clients. It appends `ClientEvent`s to
//! one ordered log per player, and the transport drains them after every
//! intent. Events are symmetric except for hidden information:
//!
//! - a drawn card's identity goes only to the drawer
//! - a revealed hand card goes to the revealer's opponent, while the
//!   revealer only learns that a reveal happened
//!
//! The copy of an event describing the other player's action carries
//! `opponent_view = true`.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId, PlayerMap};
use crate::zones::Zone;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // === Match flow ===
    MatchStarted,
    TurnStarted,
    PhaseChanged,
    /// Auto-stop fast-forwarded; `amount` counts the phases entered, the
    /// stop phase included, and `message` names where it stopped.
    PhasesAdvanced,
    PriorityPassed,
    MatchEnded,

    // === Stack ===
    CardCast,
    AbilityActivated,
    TriggerQueued,
    StackResolved,
    EffectFizzled,
    TriggerFizzled,

    // === Requests ===
    /// The recipient owes an answer; `message` names the request.
    DecisionRequested,
    NegotiationCancelled,

    // === Cards ===
    CardDrawn,
    CardMoved,
    Discarded,
    Milled,
    CreatureDied,
    TokenCreated,
    ControlChanged,
    Countered,
    Revealed,
    /// The revealer's copy of a reveal, without the card.
    RevealNotice,
    DeckShuffled,

    // === Numbers ===
    DamageDealt,
    LifeChanged,
    /// Damage removed from a creature; `amount` is how much.
    CreatureHealed,
    CountersAdded,
    StatsModified,
    PassiveGranted,
    AbilityGranted,
    ExtraTurnGranted,
    DelayedTriggerArmed,
    CostPaid,

    // === Combat ===
    AttackAssigned,
    AttackDeclared,
    CombatDamage,
}

/// Client-facing view of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub uid: EntityId,
    pub card_id: u32,
    pub name: String,
    pub owner: PlayerId,
    pub controller: Option<PlayerId>,
    pub zone: Option<Zone>,
    pub cost: i32,
    pub attack: i32,
    pub defense: i32,
    pub remaining_defense: i32,
    pub token: bool,
    pub exhausted: bool,
    pub summoning_sick: bool,
}

/// One entry in a player's event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uids: Vec<EntityId>,
    #[serde(default)]
    pub amount: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub opponent_view: bool,
}

impl ClientEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            card: None,
            uids: Vec::new(),
            amount: 0,
            message: None,
            opponent_view: false,
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: Option<CardSnapshot>) -> Self {
        self.card = card;
        self
    }

    #[must_use]
    pub fn with_uids(mut self, uids: impl IntoIterator<Item = EntityId>) -> Self {
        self.uids = uids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn seen_by_opponent(mut self) -> Self {
        self.opponent_view = true;
        self
    }
}

/// Per-player ordered event streams.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    queues: PlayerMap<Vec<ClientEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An event both players see in full. `actor` is whose action it was.
    pub fn public(&mut self, actor: PlayerId, event: ClientEvent) {
        self.queues[actor.opponent()].push(event.clone().seen_by_opponent());
        self.queues[actor].push(event);
    }

    /// An event only `recipient` sees.
    pub fn private(&mut self, recipient: PlayerId, event: ClientEvent) {
        self.queues[recipient].push(event);
    }

    /// Different versions of one event for the actor and the opponent.
    pub fn split(&mut self, actor: PlayerId, own: ClientEvent, other: ClientEvent) {
        self.queues[actor].push(own);
        self.queues[actor.opponent()].push(other.seen_by_opponent());
    }

    /// Take everything queued for `player` since the last drain.
    pub fn drain(&mut self, player: PlayerId) -> Vec<ClientEvent> {
        std::mem::take(&mut self.queues[player])
    }

    /// Events queued for `player`, without draining.
    #[must_use]
    pub fn peek(&self, player: PlayerId) -> &[ClientEvent] {
        &self.queues[player]
    }
}
