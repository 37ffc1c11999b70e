//! Default decisions for players who ran out of time.
//!
//! `do_default` turns whatever the player owes into a concrete intent and
//! runs it through the normal handlers, so a default is validated exactly
//! like a real answer.

use tracing::info;

use super::Match;
use crate::core::{DeckDestination, EntityId, Intent, PlayerId};
use crate::error::{Rejection, Result};
use crate::negotiation::{NegotiationRequest, PendingInteraction, ResolutionRequest};
use crate::zones::Zone;

fn first(candidates: &[EntityId], count: usize) -> Vec<EntityId> {
    candidates.iter().copied().take(count).collect()
}

impl Match {
    /// The intent a timed-out `player` submits, if they owe anything.
    pub(crate) fn default_intent(&self, player: PlayerId) -> Option<Intent> {
        let Some(pending) = &self.pending else {
            return (self.outcome.is_none() && self.priority.holder() == player).then_some(Intent::Pass);
        };
        if pending.player != player {
            return None;
        }

        let intent = match &pending.interaction {
            PendingInteraction::Negotiation { request, .. } => match request {
                NegotiationRequest::X { .. } => Intent::SetX(0),
                NegotiationRequest::Cost { candidates, count, .. } => Intent::select_cost(&first(candidates, *count)),
                NegotiationRequest::Mode { .. } => Intent::MakeChoice(0),
                NegotiationRequest::AlternateCost => Intent::MakeChoice(1),
                NegotiationRequest::Targets { candidates, count, .. } => {
                    Intent::select_target(&first(candidates, *count))
                }
                NegotiationRequest::Tribute { candidates, count } => {
                    Intent::select_tribute(&first(candidates, *count))
                }
            },
            PendingInteraction::Resolution(request) => match request {
                ResolutionRequest::Optional => Intent::MakeChoice(1),
                ResolutionRequest::Amount { .. } => Intent::SetAmount(0),
                ResolutionRequest::Tutor { candidates, count } => Intent::select_target(&first(candidates, *count)),
                // Putting the topmost card back last keeps the original order.
                ResolutionRequest::DeckDestinations { cards } => Intent::SelectDeckDestinations(
                    cards.iter().rev().map(|&uid| (uid, DeckDestination::Top)).collect(),
                ),
            },
            PendingInteraction::OrderTriggers { triggers } => Intent::OrderTriggers((0..triggers.len()).collect()),
            PendingInteraction::EndOfTurnDiscard { count } => {
                Intent::select_discard(&first(self.zones.cards(player, Zone::Hand), *count))
            }
            PendingInteraction::AttackTarget { attacker, candidates } => {
                let opponent = EntityId::player(player.opponent());
                let target = if candidates.contains(&opponent) {
                    Some(opponent)
                } else {
                    candidates.first().copied()
                };
                Intent::AssignAttack(target.map(|t| (*attacker, t)).into_iter().collect())
            }
        };
        Some(intent)
    }

    pub(crate) fn do_default(&mut self, player: PlayerId) -> Result<()> {
        let Some(intent) = self.default_intent(player) else {
            return Err(match &self.pending {
                Some(pending) => Rejection::NotYourDecision(pending.player),
                None if self.outcome.is_some() => Rejection::MatchOver,
                None => Rejection::NotYourPriority(player),
            }
            .into());
        };
        info!(%player, intent = intent.name(), "default decision applied");
        self.dispatch(player, &intent)
    }
}
