//! Match orchestration.
//!
//! `Match` is split across files by concern, each adding an `impl Match`
//! block:
//!
//! - `state`: the struct, construction and read-only queries
//! - `actions`: primitive board mutations (draw, move, damage, life)
//! - `turn`: phases, priority passing, auto-stop and end of turn
//! - `casting`: cast / activate checks and the negotiation pipeline
//! - `responses`: answers to the pending interaction
//! - `resolution`: resolving the top of the stack
//! - `triggers`: running queued trigger contexts
//! - `state_checks`: lethal damage and match end
//! - `combat`: attack declaration and combat damage
//! - `timeouts`: default decisions
//! - `replay`: rebuilding a match from its history
//!
//! Every client request goes through [`Match::apply`]. A rejected intent
//! changes nothing and is not recorded; an accepted one is appended to the
//! history.

mod actions;
mod casting;
mod combat;
mod registry;
mod replay;
mod resolution;
mod responses;
mod state;
mod state_checks;
mod timeouts;
mod triggers;
mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use combat::AttackState;
pub use registry::MatchRegistry;
pub use replay::{decode_history, encode_history};
pub use state::{Match, MatchOutcome, MatchSummary, SideSummary};

use tracing::{debug, warn};

use crate::core::{AttackPair, DeckDestination, EntityId, Intent, IntentRecord, Phase, PlayerId};
use crate::error::{EngineError, Rejection, Result};
use crate::negotiation::PendingInteraction;

impl Match {
    /// Apply one client intent.
    pub fn apply(&mut self, player: PlayerId, intent: Intent) -> Result<()> {
        if self.outcome.is_some() {
            return Err(Rejection::MatchOver.into());
        }

        match self.dispatch(player, &intent) {
            Ok(()) => {
                let sequence = u32::try_from(self.history.len()).unwrap_or(u32::MAX);
                self.history
                    .push_back(IntentRecord::new(player, intent, self.turn, sequence));
                Ok(())
            }
            Err(EngineError::Rejected(rejection)) => {
                debug!(%player, intent = intent.name(), %rejection, "intent rejected");
                Err(rejection.into())
            }
            Err(err) => {
                warn!(%player, intent = intent.name(), error = %err, "intent failed");
                Err(err)
            }
        }
    }

    pub(crate) fn dispatch(&mut self, player: PlayerId, intent: &Intent) -> Result<()> {
        match intent {
            Intent::Pass => self.do_pass(player),
            Intent::Cast { card } => self.do_cast(player, *card),
            Intent::Activate { card, ability } => self.do_activate(player, *card, *ability),
            Intent::SetAutoStop(phase) => self.do_set_auto_stop(player, *phase),
            Intent::CancelNegotiation => self.do_cancel(player),
            Intent::DefaultDecision => self.do_default(player),
            Intent::AssignAttack(pairs) => {
                if matches!(
                    self.pending.as_ref().map(|p| &p.interaction),
                    Some(PendingInteraction::AttackTarget { .. })
                ) {
                    self.respond(player, intent)
                } else {
                    self.do_assign_attack(player, pairs)
                }
            }
            Intent::UnassignAttack(uids) => self.do_unassign_attack(player, uids),
            Intent::SubmitAttack(pairs) => self.do_submit_attack(player, pairs),
            Intent::SelectCost(_)
            | Intent::SelectTarget(_)
            | Intent::SelectTribute(_)
            | Intent::SelectDeckDestinations(_)
            | Intent::SelectDiscard(_)
            | Intent::MakeChoice(_)
            | Intent::SetX(_)
            | Intent::SetAmount(_)
            | Intent::OrderTriggers(_) => self.respond(player, intent),
        }
    }

    // === Operation surface ===

    pub fn pass_priority(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Intent::Pass)
    }

    /// Start casting a hand card.
    pub fn attempt_to_cast(&mut self, player: PlayerId, card: EntityId) -> Result<()> {
        self.apply(player, Intent::Cast { card })
    }

    pub fn attempt_to_activate(&mut self, player: PlayerId, card: EntityId, ability: usize) -> Result<()> {
        self.apply(player, Intent::Activate { card, ability })
    }

    pub fn select_cost(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.apply(player, Intent::select_cost(uids))
    }

    /// Answer a target request or a tutor selection.
    pub fn select_target(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.apply(player, Intent::select_target(uids))
    }

    pub fn select_tribute(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.apply(player, Intent::select_tribute(uids))
    }

    pub fn select_deck_destinations(
        &mut self,
        player: PlayerId,
        destinations: Vec<(EntityId, DeckDestination)>,
    ) -> Result<()> {
        self.apply(player, Intent::SelectDeckDestinations(destinations))
    }

    pub fn select_discard(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.apply(player, Intent::select_discard(uids))
    }

    /// Mode, alternate cost (0 = alternate, 1 = life) or optional effect
    /// (0 = accept, 1 = decline).
    pub fn make_choice(&mut self, player: PlayerId, choice: usize) -> Result<()> {
        self.apply(player, Intent::MakeChoice(choice))
    }

    pub fn set_x(&mut self, player: PlayerId, x: i32) -> Result<()> {
        self.apply(player, Intent::SetX(x))
    }

    pub fn set_amount(&mut self, player: PlayerId, amount: i32) -> Result<()> {
        self.apply(player, Intent::SetAmount(amount))
    }

    pub fn assign_attack(&mut self, player: PlayerId, pairs: &[AttackPair]) -> Result<()> {
        self.apply(player, Intent::AssignAttack(pairs.to_vec()))
    }

    pub fn unassign_attack(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.apply(player, Intent::UnassignAttack(uids.iter().copied().collect()))
    }

    pub fn submit_attack(&mut self, player: PlayerId, pairs: &[AttackPair]) -> Result<()> {
        self.apply(player, Intent::SubmitAttack(pairs.to_vec()))
    }

    /// `order` lists trigger indices in the order they go on the stack.
    pub fn order_triggers(&mut self, player: PlayerId, order: Vec<usize>) -> Result<()> {
        self.apply(player, Intent::OrderTriggers(order))
    }

    pub fn set_auto_stop(&mut self, player: PlayerId, phase: Option<Phase>) -> Result<()> {
        self.apply(player, Intent::SetAutoStop(phase))
    }

    pub fn cancel_negotiation(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Intent::CancelNegotiation)
    }

    /// Answer whatever `player` owes with the deterministic default.
    pub fn apply_default_decision(&mut self, player: PlayerId) -> Result<()> {
        self.apply(player, Intent::DefaultDecision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{bolt_id, MatchFixture};

    #[test]
    fn test_accepted_intents_are_recorded_in_order() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let bolt = fixture.put_in_hand(p0, bolt_id());

        fixture.game.attempt_to_cast(p0, bolt).unwrap();
        assert!(fixture.game.pass_priority(p0).is_err());
        fixture.game.select_target(p0, &[EntityId::player(p1)]).unwrap();

        let history: Vec<_> = fixture.game.history().iter().cloned().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].intent, Intent::Cast { card: bolt });
        assert_eq!(history[1].sequence, 1);
        assert_eq!(history[1].player, p0);
    }

    #[test]
    fn test_finished_match_rejects_everything() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        fixture.game.players[p0].life = 0;
        fixture.game.check_state().unwrap();

        let err = fixture.game.pass_priority(fixture.p1()).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::MatchOver));
        let err = fixture.game.set_auto_stop(p0, None).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::MatchOver));
    }
}
