//! Trigger events and the contexts queued for detection.
//!
//! Every mutation that something could react to (a card entering play, a
//! creature dying, a phase starting) enqueues a `TriggerContext`. The
//! detection pass consumes the queue in order.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Phase, PlayerId};

/// Kinds of game events triggers can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// A creature entered play.
    Summon,
    /// A creature died (destroyed, sacrificed, or out of defense).
    Death,
    /// A card left the board without dying.
    LeftPlay,
    /// A card was milled from a deck.
    Mill,
    /// A phase began.
    Phase(Phase),
    /// A card was cast.
    Cast,
    Draw,
    /// An attacker was committed.
    Attack,
    DamageTaken,
    Discard,
}

impl TriggerEvent {
    /// Events whose subject has already left the zone it was in.
    #[must_use]
    pub const fn subject_departed(self) -> bool {
        matches!(self, TriggerEvent::Death | TriggerEvent::LeftPlay | TriggerEvent::Mill)
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerEvent::Phase(phase) => write!(f, "Phase({})", phase),
            other => write!(f, "{:?}", other),
        }
    }
}

/// One game event waiting for trigger detection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub event: TriggerEvent,
    /// The card the event is about, if any.
    pub subject: Option<EntityId>,
    /// The player the event is about (drawer, caster, damaged player).
    pub player: Option<PlayerId>,
    /// Damage dealt, cards drawn, and so on.
    pub amount: i32,
}

impl TriggerContext {
    #[must_use]
    pub fn new(event: TriggerEvent) -> Self {
        Self {
            event,
            subject: None,
            player: None,
            amount: 0,
        }
    }

    /// Context about a card.
    #[must_use]
    pub fn about(event: TriggerEvent, subject: EntityId) -> Self {
        Self {
            subject: Some(subject),
            ..Self::new(event)
        }
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_departed_subjects() {
        assert!(TriggerEvent::Death.subject_departed());
        assert!(TriggerEvent::Mill.subject_departed());
        assert!(!TriggerEvent::Summon.subject_departed());
        assert!(!TriggerEvent::Phase(Phase::End).subject_departed());
    }

    #[test]
    fn test_context_builders() {
        let ctx = TriggerContext::about(TriggerEvent::DamageTaken, EntityId(9))
            .with_player(PlayerId::new(1))
            .with_amount(3);
        assert_eq!(ctx.subject, Some(EntityId(9)));
        assert_eq!(ctx.player, Some(PlayerId::new(1)));
        assert_eq!(ctx.amount, 3);
        assert_eq!(format!("{}", TriggerEvent::Phase(Phase::Draw)), "Phase(Draw)");
    }
}
