//! Casting, activation and the negotiation pipeline.
//!
//! `negotiate` drives a `Negotiation` forward one stage at a time. A stage
//! either finishes and hands over to the next, or halts with a request; the
//! answer (see `responses`) updates the record and calls `negotiate` again,
//! which re-runs the stage it halted in.

use tracing::{debug, info};

use super::Match;
use crate::cards::{ActivatedAbility, BindSource};
use crate::core::{EntityId, PlayerId};
use crate::effects::{
    can_pay_all, has_required_targets, possible_targets, qualify, reserve_payment, ConditionContext,
    ConditionEvaluator, Cost, Effect, Qualifier,
};
use crate::error::{Rejection, Result};
use crate::events::{ClientEvent, EventKind};
use crate::negotiation::{CastStage, Negotiation, NegotiationKind, NegotiationRequest, PendingInteraction, Pending};
use crate::stack::{StackObj, StackOrigin};
use crate::triggers::{PendingTrigger, TriggerContext, TriggerEvent};
use crate::zones::{Zone, ZonePosition};

/// What one stage did.
enum Stage {
    Next,
    Halt(NegotiationRequest),
    Done,
}

impl Match {
    // === Queries ===

    /// Hand cards `player` could start casting right now.
    #[must_use]
    pub fn playable_cards(&self, player: PlayerId) -> Vec<EntityId> {
        self.zones
            .cards(player, Zone::Hand)
            .iter()
            .copied()
            .filter(|&uid| self.check_castable(player, uid).is_ok())
            .collect()
    }

    /// (card, ability index) pairs `player` could activate right now.
    #[must_use]
    pub fn activatable_abilities(&self, player: PlayerId) -> Vec<(EntityId, usize)> {
        let mut found = Vec::new();
        for uid in self.zones.board(player) {
            for index in 0..self.ability_count(uid) {
                if self.check_activatable(player, uid, index).is_ok() {
                    found.push((uid, index));
                }
            }
        }
        found
    }

    /// Legal targets for an effect controlled by `player`.
    #[must_use]
    pub fn possible_targets(&self, player: PlayerId, effect: &Effect) -> Vec<EntityId> {
        possible_targets(self, player, effect)
    }

    fn ability_count(&self, uid: EntityId) -> usize {
        let innate = self.definition(uid).map(|d| d.abilities.len()).unwrap_or(0);
        let granted = self.card(uid).map(|c| c.granted_abilities.len()).unwrap_or(0);
        innate + granted
    }

    /// Ability `index` of a card, bound to it. Granted abilities follow the
    /// definition's own.
    pub(crate) fn ability(&self, uid: EntityId, index: usize) -> Option<ActivatedAbility> {
        let definition = self.definition(uid).ok()?;
        match definition.abilities.get(index) {
            Some(ability) => Some(ability.bound_to(uid)),
            None => self
                .card(uid)?
                .granted_abilities
                .get(index - definition.abilities.len())
                .cloned(),
        }
    }

    /// Creatures `player` could tribute for `source`.
    fn tribute_candidates(&self, player: PlayerId, source: EntityId) -> Vec<EntityId> {
        let Some(tribute) = self.definition(source).ok().and_then(|d| d.tribute.as_ref()) else {
            return Vec::new();
        };
        let q = Qualifier::new(player, Some(source), &tribute.filter);
        self.zones
            .board(player)
            .filter(|&uid| qualify(self, uid, &q))
            .collect()
    }

    fn alternate_available(&self, player: PlayerId, uid: EntityId) -> bool {
        let Ok(definition) = self.definition(uid) else {
            return false;
        };
        let Some(alternate) = &definition.alternate_cost else {
            return false;
        };
        let ctx = ConditionContext::new(self, player).with_source(Some(uid));
        ConditionEvaluator::all(&alternate.conditions, &ctx)
            && alternate.costs.iter().all(Cost::is_automatic)
            && can_pay_all(&alternate.costs, self, player, uid, 0)
    }

    /// Can the life payment (plus additional costs) be made at X = `x`?
    fn life_payable(&self, player: PlayerId, uid: EntityId, x: i32) -> bool {
        let Ok(definition) = self.definition(uid) else {
            return false;
        };
        let base = self.effective_cost(uid) + x;
        self.players[player].life > base && can_pay_all(&definition.additional_costs, self, player, uid, base)
    }

    pub(crate) fn check_castable(&self, player: PlayerId, uid: EntityId) -> std::result::Result<(), Rejection> {
        if self.outcome.is_some() {
            return Err(Rejection::MatchOver);
        }
        self.require_priority(player)?;
        let definition = self.definition(uid).map_err(|_| Rejection::UnknownCard(uid))?;
        if self.zones.location(uid) != Some((player, Zone::Hand)) {
            return Err(Rejection::NotPlayable(uid));
        }
        if definition.is_summon()
            && (self.active != player || !self.phase.is_main() || !self.stack.is_empty())
        {
            return Err(Rejection::NotPlayable(uid));
        }

        let ctx = ConditionContext::new(self, player).with_source(Some(uid));
        if !ConditionEvaluator::all(&definition.cast_conditions, &ctx) {
            return Err(Rejection::NotPlayable(uid));
        }

        let alternate_ok = self.alternate_available(player, uid)
            && can_pay_all(&definition.additional_costs, self, player, uid, 0);
        if !self.life_payable(player, uid, 0) && !alternate_ok {
            return Err(Rejection::NotPlayable(uid));
        }

        if let Some(tribute) = &definition.tribute {
            let reserved = reserve_payment(&definition.additional_costs, self, player, uid, 0, &[])
                .ok_or(Rejection::NotPlayable(uid))?;
            let free = self
                .tribute_candidates(player, uid)
                .into_iter()
                .filter(|c| !reserved.contains(c))
                .count();
            if free < tribute.count {
                return Err(Rejection::NotPlayable(uid));
            }
        }

        let effects = definition.effects.bound_to(uid);
        let targets_ok = if definition.modes.is_empty() {
            has_required_targets(self, player, &effects)
        } else {
            has_required_targets(self, player, &effects)
                && definition
                    .modes
                    .iter()
                    .any(|mode| has_required_targets(self, player, &mode.effects.bound_to(uid)))
        };
        if !targets_ok {
            return Err(Rejection::NoLegalTargets);
        }
        Ok(())
    }

    pub(crate) fn check_activatable(
        &self,
        player: PlayerId,
        uid: EntityId,
        index: usize,
    ) -> std::result::Result<ActivatedAbility, Rejection> {
        if self.outcome.is_some() {
            return Err(Rejection::MatchOver);
        }
        self.require_priority(player)?;
        let refused = Rejection::NotActivatable { card: uid, ability: index };

        let on_own_board = matches!(self.zones.location(uid), Some((holder, zone)) if holder == player && zone.is_board());
        if !on_own_board {
            return Err(refused);
        }
        let ability = self.ability(uid, index).ok_or_else(|| refused.clone())?;
        if ability.once_per_turn && self.players[player].abilities_used.contains(&(uid, index)) {
            return Err(refused);
        }

        let ctx = ConditionContext::new(self, player).with_source(Some(uid));
        if !ConditionEvaluator::all(&ability.conditions, &ctx)
            || !can_pay_all(&ability.costs, self, player, uid, 0)
        {
            return Err(refused);
        }
        if !has_required_targets(self, player, &ability.effects) {
            return Err(Rejection::NoLegalTargets);
        }
        Ok(ability)
    }

    // === Starting a pipeline ===

    pub(crate) fn do_cast(&mut self, player: PlayerId, uid: EntityId) -> Result<()> {
        self.check_castable(player, uid)?;
        let definition = self.definition(uid)?;
        let effects = definition.effects.bound_to(uid);
        let costs = definition.additional_costs.clone();

        info!(%player, card = %uid, name = %definition.name, "cast started");
        let mut negotiation = Negotiation::new(NegotiationKind::Cast { card: uid }, player, effects);
        negotiation.costs = costs;
        self.negotiate(negotiation)?;
        self.settle()
    }

    pub(crate) fn do_activate(&mut self, player: PlayerId, uid: EntityId, index: usize) -> Result<()> {
        let ability = self.check_activatable(player, uid, index)?;

        info!(%player, card = %uid, ability = index, "activation started");
        let kind = NegotiationKind::Activate { card: uid, ability: index };
        let mut negotiation = Negotiation::new(kind, player, ability.effects);
        negotiation.costs = ability.costs;
        self.negotiate(negotiation)?;
        self.settle()
    }

    /// Put a detected trigger through the target stage and onto the stack.
    pub(crate) fn negotiate_trigger(&mut self, trigger: PendingTrigger) -> Result<()> {
        let player = trigger.controller;
        let effects = trigger.effects.clone();
        let mut negotiation = Negotiation::new(NegotiationKind::Trigger(Box::new(trigger)), player, effects);
        negotiation.stage = CastStage::Targets;
        self.negotiate(negotiation)
    }

    pub(crate) fn do_cancel(&mut self, player: PlayerId) -> Result<()> {
        let Some(pending) = &self.pending else {
            return Err(Rejection::NothingPending.into());
        };
        if pending.player != player {
            return Err(Rejection::NotYourDecision(pending.player).into());
        }
        let cancellable = matches!(
            &pending.interaction,
            PendingInteraction::Negotiation { negotiation, .. } if !negotiation.kind.is_trigger()
        );
        if !cancellable {
            return Err(Rejection::WrongResponse {
                expected: pending.interaction.name(),
            }
            .into());
        }
        let source = match &pending.interaction {
            PendingInteraction::Negotiation { negotiation, .. } => Some(negotiation.kind.source()),
            _ => None,
        };
        self.pending = None;
        self.announce_cancel(player, source, "cancelled");
        Ok(())
    }

    fn announce_cancel(&mut self, player: PlayerId, source: Option<EntityId>, reason: &str) {
        debug!(%player, reason, "negotiation abandoned");
        let event = ClientEvent::new(EventKind::NegotiationCancelled)
            .with_uids(source)
            .with_message(reason);
        self.events.private(player, event);
    }

    /// Record `interaction` as the one pending decision and tell `player`.
    pub(crate) fn request(&mut self, player: PlayerId, interaction: PendingInteraction) {
        let event = ClientEvent::new(EventKind::DecisionRequested).with_message(interaction.name());
        self.events.private(player, event);
        self.pending = Some(Pending { player, interaction });
    }

    // === Stages ===

    pub(crate) fn negotiate(&mut self, mut negotiation: Negotiation) -> Result<()> {
        loop {
            let stage = match negotiation.stage {
                CastStage::Amount => self.stage_amount(&negotiation),
                CastStage::AdditionalCosts => self.stage_costs(&mut negotiation),
                CastStage::Choices => self.stage_choices(&negotiation),
                CastStage::AlternateCost => self.stage_alternate(&mut negotiation),
                CastStage::Targets => self.stage_targets(&mut negotiation),
                CastStage::Payment => self.stage_payment(&mut negotiation)?,
            };
            match stage {
                Stage::Next => match negotiation.stage.next() {
                    Some(next) => negotiation.stage = next,
                    None => return Ok(()),
                },
                Stage::Halt(request) => {
                    let interaction = PendingInteraction::Negotiation {
                        negotiation: Box::new(negotiation.clone()),
                        request,
                    };
                    self.request(negotiation.player, interaction);
                    return Ok(());
                }
                Stage::Done => return Ok(()),
            }
        }
    }

    /// Life left over for X once the fixed costs are set aside.
    pub(crate) fn max_x(&self, negotiation: &Negotiation) -> i32 {
        let player = negotiation.player;
        let reserved: i32 = negotiation.costs.iter().map(Cost::life).sum();
        let card_cost = match negotiation.kind {
            NegotiationKind::Cast { card } => self.effective_cost(card),
            _ => 0,
        };
        (self.players[player].life - card_cost - reserved - 1).max(0)
    }

    fn stage_amount(&self, negotiation: &Negotiation) -> Stage {
        let wants_x = match &negotiation.kind {
            NegotiationKind::Cast { card } => self.definition(*card).map(|d| d.x_cost).unwrap_or(false),
            NegotiationKind::Activate { card, ability } => {
                self.ability(*card, *ability).map(|a| a.x_cost).unwrap_or(false)
            }
            NegotiationKind::Trigger(_) => false,
        };
        if wants_x {
            Stage::Halt(NegotiationRequest::X {
                max: self.max_x(negotiation),
            })
        } else {
            Stage::Next
        }
    }

    fn stage_costs(&mut self, negotiation: &mut Negotiation) -> Stage {
        let source = negotiation.kind.source();
        while let Some(cost) = negotiation.costs.get(negotiation.cost_index) {
            if cost.is_automatic() {
                negotiation.cost_index += 1;
                continue;
            }
            let committed: Vec<EntityId> = negotiation.committed_cards().collect();
            let candidates: Vec<EntityId> = cost
                .candidates(self, negotiation.player, source)
                .into_iter()
                .filter(|uid| !committed.contains(uid))
                .collect();
            let count = cost.selection_count();
            if candidates.len() < count {
                self.abandon(negotiation, "costs can no longer be paid");
                return Stage::Done;
            }
            return Stage::Halt(NegotiationRequest::Cost {
                cost_index: negotiation.cost_index,
                count,
                candidates,
            });
        }
        Stage::Next
    }

    fn stage_choices(&self, negotiation: &Negotiation) -> Stage {
        let NegotiationKind::Cast { card } = negotiation.kind else {
            return Stage::Next;
        };
        let options: Vec<String> = self
            .definition(card)
            .map(|d| d.modes.iter().map(|m| m.label.clone()).collect())
            .unwrap_or_default();
        if options.is_empty() || negotiation.chosen_mode.is_some() {
            Stage::Next
        } else {
            Stage::Halt(NegotiationRequest::Mode { options })
        }
    }

    fn stage_alternate(&self, negotiation: &mut Negotiation) -> Stage {
        let NegotiationKind::Cast { card } = negotiation.kind else {
            return Stage::Next;
        };
        if !self.alternate_available(negotiation.player, card) {
            return Stage::Next;
        }
        if !self.life_payable(negotiation.player, card, negotiation.x) {
            negotiation.use_alternate = true;
            return Stage::Next;
        }
        Stage::Halt(NegotiationRequest::AlternateCost)
    }

    fn stage_targets(&mut self, negotiation: &mut Negotiation) -> Stage {
        let player = negotiation.player;
        while let Some(effect) = negotiation.effects.get(negotiation.target_index) {
            if !effect.needs_targets() {
                negotiation.target_index += 1;
                continue;
            }
            let committed: Vec<EntityId> = negotiation.committed_cards().collect();
            let candidates: Vec<EntityId> = possible_targets(self, player, effect)
                .into_iter()
                .filter(|uid| !committed.contains(uid))
                .collect();
            if candidates.is_empty() {
                self.abandon(negotiation, "no legal targets");
                return Stage::Done;
            }
            return Stage::Halt(NegotiationRequest::Targets {
                effect_index: negotiation.target_index,
                count: effect.target_count.min(candidates.len()),
                candidates,
            });
        }
        Stage::Next
    }

    /// Drop a negotiation that can no longer complete.
    fn abandon(&mut self, negotiation: &Negotiation, reason: &str) {
        match &negotiation.kind {
            NegotiationKind::Trigger(trigger) => {
                debug!(source = %trigger.source, reason, "trigger fizzled");
                let event = ClientEvent::new(EventKind::TriggerFizzled)
                    .with_uids([trigger.source])
                    .with_message(reason);
                self.events.public(trigger.controller, event);
            }
            kind => self.announce_cancel(negotiation.player, Some(kind.source()), reason),
        }
    }

    fn stage_payment(&mut self, negotiation: &mut Negotiation) -> Result<Stage> {
        let player = negotiation.player;
        match negotiation.kind.clone() {
            NegotiationKind::Cast { card } => {
                let tribute = self.definition(card)?.tribute.clone();
                if let Some(tribute) = tribute {
                    if !negotiation.tribute_chosen {
                        let committed: Vec<EntityId> = negotiation.committed_cards().collect();
                        let candidates: Vec<EntityId> = self
                            .tribute_candidates(player, card)
                            .into_iter()
                            .filter(|uid| !committed.contains(uid))
                            .collect();
                        if candidates.len() < tribute.count {
                            self.abandon(negotiation, "costs can no longer be paid");
                            return Ok(Stage::Done);
                        }
                        return Ok(Stage::Halt(NegotiationRequest::Tribute {
                            count: tribute.count,
                            candidates,
                        }));
                    }
                }
                if !self.payment_still_valid(negotiation) {
                    self.abandon(negotiation, "costs can no longer be paid");
                    return Ok(Stage::Done);
                }
                self.pay_for_cast(negotiation, card)?;
            }
            NegotiationKind::Activate { card, ability } => {
                if !self.payment_still_valid(negotiation) {
                    self.abandon(negotiation, "costs can no longer be paid");
                    return Ok(Stage::Done);
                }
                self.pay_costs(player, card, &negotiation.costs, &negotiation.cost_selections)?;
                self.players[player].abilities_used.insert((card, ability));
                self.emit(player, EventKind::AbilityActivated, Some(card), i32::try_from(ability).unwrap_or(0));
                self.push_entry(card, player, StackOrigin::Ability, negotiation, None);
                self.priority.reset_to(player);
            }
            NegotiationKind::Trigger(trigger) => {
                let event = ClientEvent::new(EventKind::TriggerQueued)
                    .with_uids([trigger.source])
                    .with_message(trigger.event.to_string());
                self.events.public(player, event);
                self.push_entry(trigger.source, player, StackOrigin::Trigger, negotiation, trigger.subject);
                self.priority.reset_to(self.active);
            }
        }
        Ok(Stage::Done)
    }

    fn push_entry(
        &mut self,
        source: EntityId,
        controller: PlayerId,
        origin: StackOrigin,
        negotiation: &mut Negotiation,
        subject: Option<EntityId>,
    ) {
        let entry = StackObj {
            id: self.stack.next_id(),
            source,
            controller,
            origin,
            effects: std::mem::take(&mut negotiation.effects),
            x: negotiation.x,
            resume_index: 0,
            answer: None,
            subject,
        };
        debug!(id = %entry.id, %source, ?origin, "pushed to stack");
        self.stack.push(entry);
    }

    /// Payability re-check right before anything is paid.
    fn payment_still_valid(&self, negotiation: &Negotiation) -> bool {
        let player = negotiation.player;
        let source = negotiation.kind.source();
        let card_life = match negotiation.kind {
            NegotiationKind::Cast { card } if !negotiation.use_alternate => self.effective_cost(card) + negotiation.x,
            NegotiationKind::Cast { card } => {
                if !self.alternate_available(player, card) {
                    return false;
                }
                0
            }
            _ => 0,
        };
        if card_life > 0 && self.players[player].life <= card_life {
            return false;
        }
        let automatic: Vec<Cost> = negotiation.costs.iter().filter(|c| c.is_automatic()).cloned().collect();
        if !can_pay_all(&automatic, self, player, source, card_life) {
            return false;
        }

        let selections_ok = negotiation.costs.iter().enumerate().all(|(index, cost)| {
            if cost.is_automatic() {
                return true;
            }
            let mut chosen = negotiation.cost_selections.iter().filter(|(i, _)| *i == index);
            let (Some((_, uids)), None) = (chosen.next(), chosen.next()) else {
                return false;
            };
            let candidates = cost.candidates(self, player, source);
            uids.len() == cost.selection_count() && uids.iter().all(|uid| candidates.contains(uid))
        });

        let tribute_ok = match negotiation.kind {
            NegotiationKind::Cast { card } => {
                let needed = self
                    .definition(card)
                    .ok()
                    .and_then(|d| d.tribute.as_ref())
                    .map_or(0, |t| t.count);
                let candidates = self.tribute_candidates(player, card);
                negotiation.tribute.len() == needed && negotiation.tribute.iter().all(|uid| candidates.contains(uid))
            }
            _ => negotiation.tribute.is_empty(),
        };

        let committed: Vec<EntityId> = negotiation.committed_cards().collect();
        let distinct = committed.iter().enumerate().all(|(i, uid)| !committed[..i].contains(uid));
        selections_ok && tribute_ok && distinct
    }

    fn pay_for_cast(&mut self, negotiation: &mut Negotiation, card: EntityId) -> Result<()> {
        let player = negotiation.player;
        if negotiation.use_alternate {
            let alternate = self
                .definition(card)?
                .alternate_cost
                .as_ref()
                .map(|a| a.costs.clone())
                .unwrap_or_default();
            self.pay_costs(player, card, &alternate, &[])?;
        } else {
            let life = self.effective_cost(card) + negotiation.x;
            self.change_life(player, -life);
        }
        self.pay_costs(player, card, &negotiation.costs, &negotiation.cost_selections)?;
        for uid in std::mem::take(&mut negotiation.tribute) {
            self.destroy(uid)?;
        }

        if let Some(mode) = negotiation.chosen_mode {
            debug!(card = %card, mode, "mode chosen");
        }
        self.relocate(card, player, Zone::Stack, ZonePosition::Top)?;
        let instance = self.require_card_mut(card)?;
        instance.x_value = negotiation.x;
        instance.chosen_mode = negotiation.chosen_mode;
        self.players[player].cards_cast_this_turn += 1;

        let origin = if self.definition(card)?.is_summon() {
            StackOrigin::Summon
        } else {
            StackOrigin::Spell
        };
        self.emit(player, EventKind::CardCast, Some(card), negotiation.x);
        self.enqueue(TriggerContext::about(TriggerEvent::Cast, card).with_player(player));
        self.push_entry(card, player, origin, negotiation, None);
        self.priority.reset_to(player);
        Ok(())
    }

    /// Pay `costs`; `selections` holds the chosen cards per cost index.
    fn pay_costs(
        &mut self,
        player: PlayerId,
        source: EntityId,
        costs: &[Cost],
        selections: &[(usize, Vec<EntityId>)],
    ) -> Result<()> {
        for (index, cost) in costs.iter().enumerate() {
            let chosen: Vec<EntityId> = selections
                .iter()
                .filter(|(i, _)| *i == index)
                .flat_map(|(_, uids)| uids.iter().copied())
                .collect();
            match cost {
                Cost::Life(n) => self.change_life(player, -n),
                Cost::ExhaustSelf => self.require_card_mut(source)?.exhausted = true,
                Cost::RemoveCounters(n) => self.require_card_mut(source)?.plus_counters -= n,
                Cost::Sacrifice { .. } => {
                    for uid in chosen {
                        self.destroy(uid)?;
                    }
                }
                Cost::Discard { .. } => {
                    for uid in chosen {
                        self.discard(uid)?;
                    }
                }
                Cost::ExileFromGraveyard { .. } => {
                    for uid in chosen {
                        let owner = self.require_card(uid)?.owner;
                        self.relocate(uid, owner, Zone::Exile, ZonePosition::Top)?;
                        self.emit(player, EventKind::CardMoved, Some(uid), 0);
                    }
                }
            }
        }
        if !costs.is_empty() {
            self.emit(player, EventKind::CostPaid, Some(source), 0);
        }
        Ok(())
    }
}
