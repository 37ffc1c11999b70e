//! Turn structure: phases, priority passes, auto-stop and end of turn.

use tracing::{debug, info};

use super::combat::AttackState;
use super::Match;
use crate::core::{Phase, PlayerId};
use crate::error::{Rejection, Result};
use crate::events::{ClientEvent, EventKind};
use crate::negotiation::PendingInteraction;
use crate::triggers::{TriggerContext, TriggerEvent};
use crate::zones::Zone;

/// Upper bound on phases skipped by one fast-forward.
const MAX_SKIPPED_PHASES: usize = 2 * Phase::ORDER.len();

impl Match {
    pub(crate) fn require_priority(&self, player: PlayerId) -> std::result::Result<(), Rejection> {
        if self.pending.is_some() {
            return Err(Rejection::InteractionPending);
        }
        if self.priority.holder() != player {
            return Err(Rejection::NotYourPriority(player));
        }
        Ok(())
    }

    pub(crate) fn do_pass(&mut self, player: PlayerId) -> Result<()> {
        self.require_priority(player)?;

        let event = ClientEvent::new(EventKind::PriorityPassed);
        self.events.public(player, event);
        if !self.priority.pass() {
            return Ok(());
        }

        if self.stack.is_empty() {
            self.advance_after_passes()
        } else {
            self.resolve_top()
        }
    }

    /// Both players passed on an empty stack.
    fn advance_after_passes(&mut self) -> Result<()> {
        let both_stop = self.players.iter().all(|(_, p)| p.auto_stop.is_some());
        if !both_stop {
            return self.advance_phase();
        }

        self.fast_forward = true;
        // Counts every phase entered, including the one the run stops on.
        let mut entered = 0;
        let result = loop {
            if let Err(err) = self.advance_phase() {
                break Err(err);
            }
            entered += 1;
            if self.should_stop_fast_forward() || entered >= MAX_SKIPPED_PHASES {
                break Ok(());
            }
        };
        self.fast_forward = false;

        debug!(entered, phase = %self.phase, "auto-stop fast-forward");
        let event = ClientEvent::new(EventKind::PhasesAdvanced)
            .with_amount(i32::try_from(entered).unwrap_or(i32::MAX))
            .with_message(self.phase.to_string());
        self.events.public(self.active, event);
        result
    }

    fn should_stop_fast_forward(&self) -> bool {
        if self.outcome.is_some() || self.pending.is_some() || !self.stack.is_empty() {
            return true;
        }
        if self.players.iter().any(|(_, p)| p.auto_stop == Some(self.phase)) {
            return true;
        }
        self.phase == Phase::Combat && self.zones.board(self.active).any(|uid| self.can_attack(uid))
    }

    /// Move to the next phase, or end the turn from `End`.
    pub(crate) fn advance_phase(&mut self) -> Result<()> {
        if self.phase != Phase::End {
            return self.enter_phase(self.phase.next());
        }

        let hand = self.zones.size(self.active, Zone::Hand);
        let excess = hand.saturating_sub(self.config.max_hand_size);
        if excess > 0 {
            debug!(player = %self.active, excess, "end of turn discard");
            self.request(self.active, PendingInteraction::EndOfTurnDiscard { count: excess });
            return Ok(());
        }
        self.end_turn()
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase) -> Result<()> {
        self.phase = phase;
        self.priority.reset_to(self.active);
        if !self.fast_forward {
            let event = ClientEvent::new(EventKind::PhaseChanged).with_message(phase.to_string());
            self.events.public(self.active, event);
        }

        match phase {
            Phase::Draw => {
                let skips = self.turn == 1
                    && self.active == self.first_player
                    && self.config.first_player_skips_draw;
                if !skips {
                    self.draw_cards(self.active, self.config.draw_per_turn)?;
                }
            }
            Phase::Combat => self.attacks = AttackState::default(),
            Phase::Damage => self.combat_damage()?,
            Phase::Main | Phase::SecondMain | Phase::End => {}
        }

        self.enqueue(TriggerContext::new(TriggerEvent::Phase(phase)).with_player(self.active));
        self.settle()
    }

    /// Start the active player's next turn at Draw.
    pub(crate) fn begin_turn(&mut self) -> Result<()> {
        self.turn += 1;
        let active = self.active;
        for uid in self.zones.board(active).collect::<Vec<_>>() {
            if let Some(card) = self.card_mut(uid) {
                card.summoning_sick = false;
                card.exhausted = false;
            }
        }

        info!(turn = self.turn, player = %active, "turn started");
        let event = ClientEvent::new(EventKind::TurnStarted)
            .with_uids([crate::core::EntityId::player(active)])
            .with_amount(i32::try_from(self.turn).unwrap_or(i32::MAX));
        self.events.public(active, event);

        self.enter_phase(Phase::Draw)
    }

    /// Per-turn cleanup, then hand the turn over.
    pub(crate) fn end_turn(&mut self) -> Result<()> {
        for card in &mut self.cards {
            card.damage = 0;
            card.granted.retain(|g| !g.expires_at_end_of_turn());
        }
        for (_, player) in self.players.iter_mut() {
            player.granted.retain(|g| !g.expires_at_end_of_turn());
            player.reset_turn();
        }
        self.refresh_passives();

        let state = &mut self.players[self.active];
        if state.extra_turns > 0 {
            state.extra_turns -= 1;
            debug!(player = %self.active, "taking an extra turn");
        } else {
            self.active = self.active.opponent();
        }
        self.begin_turn()
    }

    /// Register (or clear) the phase a player wants fast-forwarding to stop at.
    pub(crate) fn do_set_auto_stop(&mut self, player: PlayerId, phase: Option<Phase>) -> Result<()> {
        self.players[player].auto_stop = phase;
        Ok(())
    }
}
