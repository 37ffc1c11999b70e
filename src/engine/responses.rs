//! Answers to the pending interaction.
//!
//! Every answer is validated in full before anything changes, so a
//! rejected answer leaves the request in place.

use tracing::debug;

use super::Match;
use crate::cards::BindSource;
use crate::core::{DeckDestination, EntityId, Intent, PlayerId};
use crate::error::{EngineError, Rejection, Result};
use crate::negotiation::{
    validate_selection, CastStage, Negotiation, NegotiationKind, NegotiationRequest, PendingInteraction,
    ResolutionRequest,
};
use crate::stack::ResolutionAnswer;
use crate::triggers::PendingTrigger;
use crate::zones::Zone;

fn selection(uids: &[EntityId], candidates: &[EntityId], count: usize) -> std::result::Result<(), Rejection> {
    validate_selection(uids, candidates, count).map_err(Rejection::InvalidSelection)
}

fn amount_in_range(value: i32, max: i32) -> std::result::Result<i32, Rejection> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::InvalidAmount(value))
    }
}

impl Match {
    pub(crate) fn respond(&mut self, player: PlayerId, intent: &Intent) -> Result<()> {
        let Some(pending) = self.pending.clone() else {
            return Err(Rejection::NothingPending.into());
        };
        if pending.player != player {
            return Err(Rejection::NotYourDecision(pending.player).into());
        }
        if !pending.interaction.accepts(intent) {
            return Err(Rejection::WrongResponse {
                expected: pending.interaction.name(),
            }
            .into());
        }

        match pending.interaction {
            PendingInteraction::Negotiation { negotiation, request } => {
                let negotiation = self.answer_negotiation(*negotiation, &request, intent)?;
                self.pending = None;
                self.negotiate(negotiation)?;
                self.settle()
            }
            PendingInteraction::Resolution(request) => {
                let answer = Self::answer_resolution(&request, intent)?;
                let top = self
                    .stack
                    .top_mut()
                    .ok_or_else(|| EngineError::invariant("resolution request without a stack entry"))?;
                top.answer = Some(answer);
                self.pending = None;
                self.resolve_top()
            }
            PendingInteraction::OrderTriggers { triggers } => {
                let Intent::OrderTriggers(order) = intent else {
                    return Err(EngineError::invariant("accepted intent does not match order request"));
                };
                let ordered = Self::apply_order(&triggers, order)?;
                debug!(%player, count = ordered.len(), "triggers ordered");
                self.pending = None;
                self.ready_triggers.extend(ordered);
                self.settle()
            }
            PendingInteraction::EndOfTurnDiscard { count } => {
                let Intent::SelectDiscard(uids) = intent else {
                    return Err(EngineError::invariant("accepted intent does not match discard request"));
                };
                selection(uids, self.zones.cards(player, Zone::Hand), count)?;
                self.pending = None;
                for &uid in uids {
                    self.discard(uid)?;
                }
                self.end_turn()
            }
            PendingInteraction::AttackTarget { attacker, candidates } => {
                let pair = match intent {
                    Intent::AssignAttack(pairs) => match pairs.as_slice() {
                        [pair] if pair.0 == attacker => *pair,
                        _ => return Err(Rejection::InvalidSelection(format!("assign one target to {}", attacker)).into()),
                    },
                    _ => return Err(EngineError::invariant("accepted intent does not match attack request")),
                };
                if !candidates.contains(&pair.1) {
                    return Err(Rejection::InvalidAttackTarget(pair.1).into());
                }
                self.pending = None;
                self.commit_attack(player, pair)?;
                self.settle()
            }
        }
    }

    /// Fold an answer into the negotiation record.
    fn answer_negotiation(
        &self,
        mut negotiation: Negotiation,
        request: &NegotiationRequest,
        intent: &Intent,
    ) -> Result<Negotiation> {
        match (request, intent) {
            (NegotiationRequest::X { max }, Intent::SetX(x)) => {
                negotiation.x = amount_in_range(*x, *max)?;
                negotiation.stage = CastStage::AdditionalCosts;
            }
            (NegotiationRequest::Cost { cost_index, candidates, count }, Intent::SelectCost(uids)) => {
                selection(uids, candidates, *count)?;
                negotiation.cost_selections.push((*cost_index, uids.to_vec()));
                negotiation.cost_index = cost_index + 1;
            }
            (NegotiationRequest::Mode { options }, Intent::MakeChoice(choice)) => {
                if *choice >= options.len() {
                    return Err(Rejection::InvalidChoice(*choice).into());
                }
                if let NegotiationKind::Cast { card } = negotiation.kind {
                    let mode = self
                        .definition(card)?
                        .modes
                        .get(*choice)
                        .ok_or_else(|| EngineError::invariant(format!("{} has no mode {}", card, choice)))?;
                    negotiation.effects.extend(mode.effects.bound_to(card));
                }
                negotiation.chosen_mode = Some(*choice);
            }
            (NegotiationRequest::AlternateCost, Intent::MakeChoice(choice)) => {
                negotiation.use_alternate = match choice {
                    0 => true,
                    1 => false,
                    _ => return Err(Rejection::InvalidChoice(*choice).into()),
                };
                negotiation.stage = CastStage::Targets;
            }
            (NegotiationRequest::Targets { effect_index, candidates, count }, Intent::SelectTarget(uids)) => {
                selection(uids, candidates, *count)?;
                let effect = negotiation
                    .effects
                    .get_mut(*effect_index)
                    .ok_or_else(|| EngineError::invariant(format!("no effect at index {}", effect_index)))?;
                effect.targets = uids.to_vec();
                negotiation.target_index = effect_index + 1;
            }
            (NegotiationRequest::Tribute { candidates, count }, Intent::SelectTribute(uids)) => {
                selection(uids, candidates, *count)?;
                negotiation.tribute = uids.to_vec();
                negotiation.tribute_chosen = true;
            }
            _ => return Err(EngineError::invariant("accepted intent does not match negotiation request")),
        }
        Ok(negotiation)
    }

    fn answer_resolution(request: &ResolutionRequest, intent: &Intent) -> Result<ResolutionAnswer> {
        let answer = match (request, intent) {
            (ResolutionRequest::Optional, Intent::MakeChoice(choice)) => match choice {
                0 => ResolutionAnswer::Optional(true),
                1 => ResolutionAnswer::Optional(false),
                _ => return Err(Rejection::InvalidChoice(*choice).into()),
            },
            (ResolutionRequest::Amount { max }, Intent::SetAmount(value)) => {
                ResolutionAnswer::Amount(amount_in_range(*value, *max)?)
            }
            (ResolutionRequest::Tutor { candidates, count }, Intent::SelectTarget(uids)) => {
                selection(uids, candidates, *count)?;
                ResolutionAnswer::Cards(uids.to_vec())
            }
            (ResolutionRequest::DeckDestinations { cards }, Intent::SelectDeckDestinations(assigned)) => {
                Self::check_destinations(cards, assigned)?;
                ResolutionAnswer::Destinations(assigned.clone())
            }
            _ => return Err(EngineError::invariant("accepted intent does not match resolution request")),
        };
        Ok(answer)
    }

    /// Every peeked card gets exactly one destination.
    fn check_destinations(
        cards: &[EntityId],
        assigned: &[(EntityId, DeckDestination)],
    ) -> std::result::Result<(), Rejection> {
        let uids: Vec<EntityId> = assigned.iter().map(|(uid, _)| *uid).collect();
        selection(&uids, cards, cards.len())
    }

    /// `order` lists trigger indices in the order they go on the stack.
    fn apply_order(triggers: &[PendingTrigger], order: &[usize]) -> std::result::Result<Vec<PendingTrigger>, Rejection> {
        let n = triggers.len();
        let mut seen = vec![false; n];
        for &i in order {
            if i >= n || std::mem::replace(&mut seen[i], true) {
                return Err(Rejection::InvalidOrder(n));
            }
        }
        if order.len() != n {
            return Err(Rejection::InvalidOrder(n));
        }
        Ok(order.iter().map(|&i| triggers[i].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{bolt_id, knight_id, MatchFixture};

    #[test]
    fn test_answer_from_wrong_player_rejected() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let bolt = fixture.put_in_hand(p0, bolt_id());
        fixture.game.attempt_to_cast(p0, bolt).unwrap();

        let err = fixture.game.select_target(p1, &[EntityId::player(p0)]).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::NotYourDecision(p0)));
    }

    #[test]
    fn test_wrong_kind_of_answer_rejected() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let bolt = fixture.put_in_hand(p0, bolt_id());
        fixture.game.attempt_to_cast(p0, bolt).unwrap();

        let err = fixture.game.make_choice(p0, 0).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::WrongResponse { expected: "targets" }));
        assert!(fixture.game.pending().is_some());
    }

    #[test]
    fn test_invalid_target_keeps_request() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let bolt = fixture.put_in_hand(p0, bolt_id());
        let stranger = fixture.put_in_hand(p0, knight_id());
        fixture.game.attempt_to_cast(p0, bolt).unwrap();

        let err = fixture.game.select_target(p0, &[stranger]).unwrap_err();
        assert!(matches!(err.rejection(), Some(Rejection::InvalidSelection(_))));
        assert!(fixture.game.pending().is_some());
        assert_eq!(fixture.game.life(p0), 20);
    }

    #[test]
    fn test_answer_without_pending_rejected() {
        let mut fixture = MatchFixture::new();
        let err = fixture.game.set_amount(fixture.p0(), 1).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::NothingPending));
    }

    #[test]
    fn test_order_must_be_permutation() {
        let trigger = PendingTrigger {
            source: EntityId(5),
            controller: PlayerId::new(0),
            effects: Vec::new(),
            event: crate::triggers::TriggerEvent::Death,
            subject: None,
        };
        let triggers = vec![trigger.clone(), trigger];

        assert_eq!(Match::apply_order(&triggers, &[0, 0]), Err(Rejection::InvalidOrder(2)));
        assert_eq!(Match::apply_order(&triggers, &[1]), Err(Rejection::InvalidOrder(2)));
        assert_eq!(Match::apply_order(&triggers, &[1, 0]).map(|t| t.len()), Ok(2));
    }

    #[test]
    fn test_destinations_cover_each_card_once() {
        let cards = [EntityId(4), EntityId(6)];
        let ok = [(EntityId(6), DeckDestination::Top), (EntityId(4), DeckDestination::Bottom)];
        let missing = [(EntityId(6), DeckDestination::Hand)];
        let doubled = [(EntityId(6), DeckDestination::Hand), (EntityId(6), DeckDestination::Top)];

        assert!(Match::check_destinations(&cards, &ok).is_ok());
        assert!(Match::check_destinations(&cards, &missing).is_err());
        assert!(Match::check_destinations(&cards, &doubled).is_err());
    }
}
