//! The negotiation protocol.
//!
//! Casting a card, activating an ability and putting a trigger on the stack
//! all walk the same ordered stages:
//!
//! ```text
//! Amount (X) -> AdditionalCosts -> Choices -> AlternateCost -> Targets -> Payment
//! ```
//!
//! A stage either completes on its own or halts with a request. The
//! `Negotiation` record holds everything needed to resume at that stage,
//! and nothing is paid until `Payment`, so an abandoned negotiation leaves
//! no trace.
//!
//! The same `PendingInteraction` type also covers requests raised while
//! the stack resolves, trigger ordering, the end-of-turn discard and the
//! attack target of a creature that enters attacking. At most one exists
//! per match.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Intent, PlayerId};
use crate::effects::{Cost, Effect};
use crate::triggers::PendingTrigger;

/// Pipeline stages, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CastStage {
    Amount,
    AdditionalCosts,
    Choices,
    AlternateCost,
    Targets,
    Payment,
}

impl CastStage {
    /// The stage after this one. `Payment` is last.
    #[must_use]
    pub const fn next(self) -> Option<CastStage> {
        match self {
            CastStage::Amount => Some(CastStage::AdditionalCosts),
            CastStage::AdditionalCosts => Some(CastStage::Choices),
            CastStage::Choices => Some(CastStage::AlternateCost),
            CastStage::AlternateCost => Some(CastStage::Targets),
            CastStage::Targets => Some(CastStage::Payment),
            CastStage::Payment => None,
        }
    }
}

/// What is being negotiated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NegotiationKind {
    Cast { card: EntityId },
    Activate { card: EntityId, ability: usize },
    Trigger(Box<PendingTrigger>),
}

impl NegotiationKind {
    /// The card the stack entry will name as its source.
    #[must_use]
    pub fn source(&self) -> EntityId {
        match self {
            NegotiationKind::Cast { card } | NegotiationKind::Activate { card, .. } => *card,
            NegotiationKind::Trigger(trigger) => trigger.source,
        }
    }

    #[must_use]
    pub fn is_trigger(&self) -> bool {
        matches!(self, NegotiationKind::Trigger(_))
    }
}

/// One in-progress pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    pub kind: NegotiationKind,
    pub player: PlayerId,
    pub stage: CastStage,
    pub x: i32,
    /// Additional costs for a cast, the ability's costs for an activation.
    pub costs: Vec<Cost>,
    /// Next cost to look at during `AdditionalCosts`.
    pub cost_index: usize,
    /// (cost index, chosen cards) for every selection cost answered so far.
    pub cost_selections: Vec<(usize, Vec<EntityId>)>,
    pub chosen_mode: Option<usize>,
    pub use_alternate: bool,
    /// Bound clones; targets are written into them during `Targets`.
    pub effects: Vec<Effect>,
    /// Next effect to look at during `Targets`.
    pub target_index: usize,
    pub tribute: Vec<EntityId>,
    /// Set once the tribute request has been answered.
    pub tribute_chosen: bool,
}

impl Negotiation {
    #[must_use]
    pub fn new(kind: NegotiationKind, player: PlayerId, effects: Vec<Effect>) -> Self {
        Self {
            kind,
            player,
            stage: CastStage::Amount,
            x: 0,
            costs: Vec::new(),
            cost_index: 0,
            cost_selections: Vec::new(),
            chosen_mode: None,
            use_alternate: false,
            effects,
            target_index: 0,
            tribute: Vec::new(),
            tribute_chosen: false,
        }
    }

    /// Cards already promised to earlier selection costs.
    pub fn committed_cards(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cost_selections
            .iter()
            .flat_map(|(_, uids)| uids.iter().copied())
            .chain(self.tribute.iter().copied())
    }
}

/// What a negotiation is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationRequest {
    X { max: i32 },
    Cost { cost_index: usize, candidates: Vec<EntityId>, count: usize },
    Mode { options: Vec<String> },
    /// 0 pays the alternate cost, 1 pays life.
    AlternateCost,
    Targets { effect_index: usize, candidates: Vec<EntityId>, count: usize },
    Tribute { candidates: Vec<EntityId>, count: usize },
}

/// What a suspended resolution is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionRequest {
    /// 0 accepts the optional effect, 1 declines it.
    Optional,
    Amount { max: i32 },
    Tutor { candidates: Vec<EntityId>, count: usize },
    DeckDestinations { cards: Vec<EntityId> },
}

/// The one thing the match is waiting on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PendingInteraction {
    Negotiation {
        negotiation: Box<Negotiation>,
        request: NegotiationRequest,
    },
    Resolution(ResolutionRequest),
    OrderTriggers { triggers: Vec<PendingTrigger> },
    EndOfTurnDiscard { count: usize },
    AttackTarget { attacker: EntityId, candidates: Vec<EntityId> },
}

impl PendingInteraction {
    /// Short name, used in request events and rejections.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PendingInteraction::Negotiation { request, .. } => match request {
                NegotiationRequest::X { .. } => "x",
                NegotiationRequest::Cost { .. } => "cost",
                NegotiationRequest::Mode { .. } => "mode",
                NegotiationRequest::AlternateCost => "alternate_cost",
                NegotiationRequest::Targets { .. } => "targets",
                NegotiationRequest::Tribute { .. } => "tribute",
            },
            PendingInteraction::Resolution(request) => match request {
                ResolutionRequest::Optional => "optional",
                ResolutionRequest::Amount { .. } => "amount",
                ResolutionRequest::Tutor { .. } => "tutor",
                ResolutionRequest::DeckDestinations { .. } => "deck_destinations",
            },
            PendingInteraction::OrderTriggers { .. } => "order_triggers",
            PendingInteraction::EndOfTurnDiscard { .. } => "discard",
            PendingInteraction::AttackTarget { .. } => "attack_target",
        }
    }

    /// Is `intent` the right kind of answer?
    #[must_use]
    pub fn accepts(&self, intent: &Intent) -> bool {
        use NegotiationRequest as N;
        use ResolutionRequest as R;

        match (self, intent) {
            (PendingInteraction::Negotiation { request, .. }, intent) => matches!(
                (request, intent),
                (N::X { .. }, Intent::SetX(_))
                    | (N::Cost { .. }, Intent::SelectCost(_))
                    | (N::Mode { .. } | N::AlternateCost, Intent::MakeChoice(_))
                    | (N::Targets { .. }, Intent::SelectTarget(_))
                    | (N::Tribute { .. }, Intent::SelectTribute(_))
            ),
            (PendingInteraction::Resolution(request), intent) => matches!(
                (request, intent),
                (R::Optional, Intent::MakeChoice(_))
                    | (R::Amount { .. }, Intent::SetAmount(_))
                    | (R::Tutor { .. }, Intent::SelectTarget(_))
                    | (R::DeckDestinations { .. }, Intent::SelectDeckDestinations(_))
            ),
            (PendingInteraction::OrderTriggers { .. }, Intent::OrderTriggers(_)) => true,
            (PendingInteraction::EndOfTurnDiscard { .. }, Intent::SelectDiscard(_)) => true,
            (PendingInteraction::AttackTarget { .. }, Intent::AssignAttack(_)) => true,
            _ => false,
        }
    }
}

/// A pending interaction and the player who owes the answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pending {
    pub player: PlayerId,
    pub interaction: PendingInteraction,
}

/// Check a uid selection: exactly `count` distinct members of `candidates`.
pub fn validate_selection(
    selection: &[EntityId],
    candidates: &[EntityId],
    count: usize,
) -> Result<(), String> {
    if selection.len() != count {
        return Err(format!("expected {} cards, got {}", count, selection.len()));
    }
    for (i, uid) in selection.iter().enumerate() {
        if !candidates.contains(uid) {
            return Err(format!("{} is not a legal choice", uid));
        }
        if selection[..i].contains(uid) {
            return Err(format!("{} was chosen twice", uid));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;

    #[test]
    fn test_stage_order() {
        let mut stage = CastStage::Amount;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(stage, CastStage::Payment);
    }

    #[test]
    fn test_accepts_matching_intent_only() {
        let targets = PendingInteraction::Negotiation {
            negotiation: Box::new(Negotiation::new(
                NegotiationKind::Cast { card: EntityId(5) },
                PlayerId::new(0),
                Vec::new(),
            )),
            request: NegotiationRequest::Targets {
                effect_index: 0,
                candidates: vec![EntityId(1)],
                count: 1,
            },
        };
        assert!(targets.accepts(&Intent::select_target(&[EntityId(1)])));
        assert!(!targets.accepts(&Intent::MakeChoice(0)));
        assert_eq!(targets.name(), "targets");

        let optional = PendingInteraction::Resolution(ResolutionRequest::Optional);
        assert!(optional.accepts(&Intent::MakeChoice(1)));
        assert!(!optional.accepts(&Intent::SetAutoStop(Some(Phase::End))));
    }

    #[test]
    fn test_validate_selection() {
        let candidates = [EntityId(3), EntityId(4), EntityId(5)];
        assert!(validate_selection(&[EntityId(3), EntityId(5)], &candidates, 2).is_ok());
        assert!(validate_selection(&[EntityId(3)], &candidates, 2).is_err());
        assert!(validate_selection(&[EntityId(3), EntityId(3)], &candidates, 2).is_err());
        assert!(validate_selection(&[EntityId(9)], &candidates, 1).is_err());
    }
}
