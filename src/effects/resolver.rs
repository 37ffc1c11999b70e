//! Effect resolution - executing effects on match state.
//!
//! `EffectResolver::execute` runs one effect and then its additional
//! effects. The result is one of:
//! - `Applied`: the effect changed the board (possibly nothing, for a mass
//!   effect with no qualifying entities)
//! - `Fizzled`: conditions failed, every target is gone, or the amount could
//!   not be computed. Nothing changed.
//! - `Suspended`: the controller has to answer a request first. Nothing
//!   changed yet, and running the effect again with the answer picks up
//!   where it stopped.
//!
//! Additional effects never suspend. An optional child is taken as
//! accepted, a chosen amount takes its maximum, a nested tutor takes the
//! first candidates and a nested peek leaves the cards where they are.

use tracing::debug;

use super::amount::AmountContext;
use super::condition::{ConditionContext, ConditionEvaluator};
use super::effect::{CounterKind, Effect, EffectKind, TargetType};
use super::qualifier::{qualify, Qualifier};
use super::targeting::{is_eligible, is_legal_target, universe};
use crate::cards::BindSource;
use crate::core::{DeckDestination, EntityId, PlayerId};
use crate::engine::Match;
use crate::error::Result;
use crate::events::{ClientEvent, EventKind};
use crate::negotiation::ResolutionRequest;
use crate::passives::{GrantedPassive, PassiveKind};
use crate::stack::ResolutionAnswer;
use crate::triggers::{DelayedTrigger, TriggerDefinition};
use crate::zones::{Zone, ZonePosition};

/// What running an effect did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    Applied,
    Fizzled(String),
    Suspended(ResolutionRequest),
}

/// Who is resolving, and on whose behalf.
#[derive(Clone, Debug)]
pub struct ResolveContext {
    pub source: EntityId,
    pub controller: PlayerId,
    pub x: i32,
    /// Card the originating trigger event was about.
    pub subject: Option<EntityId>,
    /// Entities the parent effect affected, for additional effects.
    pub parent_affected: Option<Vec<EntityId>>,
    /// Whether the effect may suspend for a player decision.
    pub interactive: bool,
}

impl ResolveContext {
    #[must_use]
    pub fn new(source: EntityId, controller: PlayerId) -> Self {
        Self {
            source,
            controller,
            x: 0,
            subject: None,
            parent_affected: None,
            interactive: true,
        }
    }

    #[must_use]
    pub fn with_x(mut self, x: i32) -> Self {
        self.x = x;
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Option<EntityId>) -> Self {
        self.subject = subject;
        self
    }

    fn nested(&self, parent_affected: Vec<EntityId>) -> Self {
        Self {
            parent_affected: Some(parent_affected),
            interactive: false,
            ..self.clone()
        }
    }
}

fn fizzle(reason: impl Into<String>) -> Result<EffectOutcome> {
    Ok(EffectOutcome::Fizzled(reason.into()))
}

/// Resolves effects against a match.
pub struct EffectResolver;

impl EffectResolver {
    /// Run `effect`, then its additional effects if it applied.
    ///
    /// `answer` is the controller's reply to a request this effect raised
    /// earlier. Death checks and passive refresh run after the effect and
    /// after each additional effect.
    pub fn execute(
        game: &mut Match,
        ctx: &ResolveContext,
        effect: &mut Effect,
        answer: Option<ResolutionAnswer>,
    ) -> Result<EffectOutcome> {
        let conditions_hold = {
            let cctx = ConditionContext::new(game, ctx.controller)
                .with_source(Some(ctx.source))
                .with_subject(ctx.subject);
            ConditionEvaluator::all(&effect.conditions, &cctx)
        };
        if !conditions_hold {
            return fizzle("conditions not met");
        }

        let affected = match Self::affected(game, ctx, effect) {
            Ok(affected) => affected,
            Err(reason) => return fizzle(reason),
        };

        let amount_ctx = AmountContext {
            game: &*game,
            controller: ctx.controller,
            target: affected.first().copied(),
            x: ctx.x,
            parent_affected: ctx.parent_affected.as_ref().map(Vec::len),
        };
        let mut amount = match effect.amount.resolve(&amount_ctx) {
            Ok(amount) => amount,
            Err(err) => return fizzle(err.to_string()),
        };

        let mut answer = answer;
        if effect.choose_amount {
            if let Some(ResolutionAnswer::Amount(chosen)) = answer {
                effect.chosen_amount = Some(chosen);
                answer = None;
            }
            match effect.chosen_amount {
                Some(chosen) => amount = chosen,
                None if ctx.interactive => {
                    return Ok(EffectOutcome::Suspended(ResolutionRequest::Amount {
                        max: amount.max(0),
                    }))
                }
                None => {}
            }
        }

        let outcome = Self::apply(game, ctx, effect, &affected, amount, answer)?;
        let touched = match outcome {
            Applied::Done(touched) => touched,
            Applied::Wait(request) => return Ok(EffectOutcome::Suspended(request)),
        };
        effect.affected = touched;
        game.check_state()?;

        Self::run_additional(game, ctx, effect)?;
        Ok(EffectOutcome::Applied)
    }

    /// Entities the effect applies to right now.
    fn affected(game: &Match, ctx: &ResolveContext, effect: &Effect) -> std::result::Result<Vec<EntityId>, String> {
        let me = ctx.controller;
        let affected = match effect.target {
            t if t.needs_selection() => {
                let still_legal: Vec<EntityId> = effect
                    .targets
                    .iter()
                    .copied()
                    .filter(|&uid| is_legal_target(game, me, effect, uid))
                    .collect();
                if still_legal.is_empty() {
                    return Err("no legal targets remain".to_string());
                }
                still_legal
            }
            TargetType::None | TargetType::Controller => vec![EntityId::player(me)],
            TargetType::Opponent => vec![EntityId::player(me.opponent())],
            TargetType::EachPlayer => me.and_opponent().map(EntityId::player).collect(),
            TargetType::SelfCard => {
                if game.card(ctx.source).is_none() {
                    return Err(format!("source {} is gone", ctx.source));
                }
                vec![ctx.source]
            }
            TargetType::ParentAffected => ctx
                .parent_affected
                .clone()
                .ok_or_else(|| "no parent effect".to_string())?,
            TargetType::Subject => vec![ctx.subject.ok_or_else(|| "no event subject".to_string())?],
            mass => {
                let q = Qualifier::new(me, Some(ctx.source), &effect.filter);
                universe(game, me, mass)
                    .into_iter()
                    .filter(|&uid| is_eligible(game, me, effect, uid, false) && qualify(game, uid, &q))
                    .collect()
            }
        };
        Ok(affected)
    }

    fn run_additional(game: &mut Match, ctx: &ResolveContext, parent: &Effect) -> Result<()> {
        if parent.additional.is_empty() {
            return Ok(());
        }

        let groups: Vec<Vec<EntityId>> = if parent.per_affected {
            parent.affected.iter().map(|&uid| vec![uid]).collect()
        } else {
            vec![parent.affected.clone()]
        };

        for group in groups {
            let nested = ctx.nested(group.clone());
            for child in &parent.additional {
                let mut child = child.clone();
                if child.target.needs_selection() {
                    child.targets = if parent.per_affected {
                        group.clone()
                    } else {
                        parent.targets.clone()
                    };
                }
                child.optional = false;
                if let EffectOutcome::Fizzled(reason) = Self::execute(game, &nested, &mut child, None)? {
                    Self::report_fizzle(game, ctx, &reason);
                }
            }
        }
        Ok(())
    }

    /// Emit the fizzle event for an effect from `ctx.source`.
    pub fn report_fizzle(game: &mut Match, ctx: &ResolveContext, reason: &str) {
        debug!(source = %ctx.source, reason, "effect fizzled");
        let event = ClientEvent::new(EventKind::EffectFizzled)
            .with_uids([ctx.source])
            .with_message(reason);
        game.events.public(ctx.controller, event);
    }

    fn apply(
        game: &mut Match,
        ctx: &ResolveContext,
        effect: &Effect,
        affected: &[EntityId],
        amount: i32,
        answer: Option<ResolutionAnswer>,
    ) -> Result<Applied> {
        let me = ctx.controller;
        let count = usize::try_from(amount).unwrap_or(0);
        let players = || affected.iter().filter_map(|uid| uid.as_player());
        let mut touched = Vec::new();

        match &effect.kind {
            EffectKind::Damage => {
                for &target in affected {
                    if game.deal_damage(me, Some(ctx.source), target, amount)? > 0 {
                        touched.push(target);
                    }
                }
            }
            EffectKind::Heal => {
                for &target in affected {
                    match target.as_player() {
                        Some(player) => game.change_life(player, amount.max(0)),
                        None => {
                            let card = game.require_card_mut(target)?;
                            let healed = card.damage.min(amount.max(0));
                            card.damage -= healed;
                            game.emit(me, EventKind::CreatureHealed, Some(target), healed);
                        }
                    }
                    touched.push(target);
                }
            }
            EffectKind::LoseLife => {
                for player in players() {
                    game.change_life(player, -amount.max(0));
                    touched.push(EntityId::player(player));
                }
            }
            EffectKind::Draw => {
                for player in players() {
                    touched.extend(game.draw_cards(player, count)?);
                }
            }
            EffectKind::Discard => {
                for player in players() {
                    let hand = game.zones.cards(player, Zone::Hand).to_vec();
                    let picks = game.rng.sample_indices(hand.len(), count);
                    for index in picks {
                        game.discard(hand[index])?;
                        touched.push(hand[index]);
                    }
                }
            }
            EffectKind::Mill => {
                for player in players() {
                    touched.extend(game.mill(player, count)?);
                }
            }
            EffectKind::Destroy => {
                for &uid in affected {
                    if game.destroy(uid)? {
                        touched.push(uid);
                    }
                }
            }
            EffectKind::Exile => {
                for &uid in affected.iter().filter(|uid| !uid.is_player()) {
                    if game.zones.on_board(uid) {
                        game.remove_from_play(uid, Zone::Exile)?;
                    } else {
                        let owner = game.require_card(uid)?.owner;
                        game.relocate(uid, owner, Zone::Exile, ZonePosition::Top)?;
                        game.emit(me, EventKind::CardMoved, Some(uid), 0);
                    }
                    touched.push(uid);
                }
            }
            EffectKind::ReturnToHand => {
                for &uid in affected {
                    if game.remove_from_play(uid, Zone::Hand)? {
                        touched.push(uid);
                    }
                }
            }
            EffectKind::Resurrect => {
                for &uid in affected {
                    let is_summon = game.definition(uid).map(|d| d.is_summon()).unwrap_or(false);
                    if is_summon && game.zones.is_in(uid, Zone::Graveyard) {
                        game.enter_play(uid, me)?;
                        game.emit(me, EventKind::CardMoved, Some(uid), 0);
                        touched.push(uid);
                    }
                }
            }
            EffectKind::AddCounters(kind) => {
                for &uid in affected {
                    if !game.zones.on_board(uid) {
                        continue;
                    }
                    let card = game.require_card_mut(uid)?;
                    match kind {
                        CounterKind::PlusOne => card.plus_counters += amount,
                        CounterKind::MinusOne => card.minus_counters += amount,
                    }
                    game.emit(me, EventKind::CountersAdded, Some(uid), amount);
                    touched.push(uid);
                }
            }
            EffectKind::ModifyStats { attack, defense } => {
                let boost = PassiveKind::StatBoost {
                    attack: *attack,
                    defense: *defense,
                };
                touched = Self::grant(game, ctx, affected, &boost, true, EventKind::StatsModified);
            }
            EffectKind::GrantPassive {
                passive,
                until_end_of_turn,
            } => {
                touched = Self::grant(game, ctx, affected, passive, *until_end_of_turn, EventKind::PassiveGranted);
            }
            EffectKind::GrantAbility(ability) => {
                for &uid in affected.iter().filter(|uid| !uid.is_player()) {
                    game.require_card_mut(uid)?
                        .granted_abilities
                        .push(ability.bound_to(uid));
                    game.emit(me, EventKind::AbilityGranted, Some(uid), 0);
                    touched.push(uid);
                }
            }
            EffectKind::SummonToken(kind) => {
                for player in players() {
                    for _ in 0..count {
                        touched.push(game.create_token(player, *kind)?);
                    }
                }
            }
            EffectKind::TakeControl => {
                for &uid in affected {
                    if Self::take_control(game, me, uid)? {
                        touched.push(uid);
                    }
                }
            }
            EffectKind::Counter => {
                for &uid in affected {
                    if game.stack.remove_source(uid).is_some() {
                        game.bury(uid)?;
                        game.emit(me, EventKind::Countered, Some(uid), 0);
                        touched.push(uid);
                    }
                }
            }
            EffectKind::Tutor => {
                let q = Qualifier::new(me, Some(ctx.source), &effect.filter);
                let candidates: Vec<EntityId> = game
                    .zones
                    .cards(me, Zone::Deck)
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&uid| qualify(game, uid, &q))
                    .collect();
                let wanted = count.min(candidates.len());

                let chosen = match answer {
                    Some(ResolutionAnswer::Cards(chosen)) => chosen,
                    _ if wanted == 0 => Vec::new(),
                    _ if ctx.interactive => {
                        return Ok(Applied::Wait(ResolutionRequest::Tutor {
                            candidates,
                            count: wanted,
                        }))
                    }
                    _ => candidates[..wanted].to_vec(),
                };
                for &uid in &chosen {
                    game.relocate(uid, me, Zone::Hand, ZonePosition::Top)?;
                    let own = ClientEvent::new(EventKind::CardMoved)
                        .with_card(game.snapshot(uid))
                        .with_uids([uid]);
                    game.events.split(me, own, ClientEvent::new(EventKind::CardMoved));
                }
                game.zones.shuffle(me, Zone::Deck, &mut game.rng);
                game.events.public(me, ClientEvent::new(EventKind::DeckShuffled));
                touched = chosen;
            }
            EffectKind::DeckPeek => {
                let cards = game.zones.top_n(me, Zone::Deck, count);
                match answer {
                    Some(ResolutionAnswer::Destinations(destinations)) => {
                        touched = Self::place_peeked(game, me, &destinations)?;
                    }
                    _ if cards.is_empty() || !ctx.interactive => touched = cards,
                    _ => return Ok(Applied::Wait(ResolutionRequest::DeckDestinations { cards })),
                }
            }
            EffectKind::Reveal => {
                for &target in affected {
                    let (revealer, cards) = match target.as_player() {
                        Some(player) => (player, game.zones.cards(player, Zone::Hand).to_vec()),
                        None => match game.zones.location(target) {
                            Some((player, Zone::Hand)) => (player, vec![target]),
                            _ => continue,
                        },
                    };
                    for uid in cards {
                        let shown = ClientEvent::new(EventKind::Revealed)
                            .with_card(game.snapshot(uid))
                            .with_uids([uid]);
                        game.events
                            .split(revealer, ClientEvent::new(EventKind::RevealNotice), shown);
                        touched.push(uid);
                    }
                }
            }
            EffectKind::ExtraTurn => {
                for player in players() {
                    game.players[player].extra_turns += count as u32;
                    game.emit(player, EventKind::ExtraTurnGranted, None, amount);
                    touched.push(EntityId::player(player));
                }
            }
            EffectKind::ShuffleDeck => {
                for player in players() {
                    game.zones.shuffle(player, Zone::Deck, &mut game.rng);
                    game.events.public(player, ClientEvent::new(EventKind::DeckShuffled));
                    touched.push(EntityId::player(player));
                }
            }
            EffectKind::Sacrifice => {
                for player in players() {
                    for uid in Self::weakest(game, player, count) {
                        if game.destroy(uid)? {
                            touched.push(uid);
                        }
                    }
                }
            }
            EffectKind::DelayedTrigger(trigger) => {
                Self::arm(game, ctx, trigger);
            }
        }

        Ok(Applied::Done(touched))
    }

    fn grant(
        game: &mut Match,
        ctx: &ResolveContext,
        affected: &[EntityId],
        kind: &PassiveKind,
        until_end_of_turn: bool,
        event: EventKind,
    ) -> Vec<EntityId> {
        let mut touched = Vec::new();
        for &uid in affected {
            let grant = GrantedPassive::from_effect(kind.clone(), ctx.source, until_end_of_turn);
            if let Some(grants) = game.grants_mut(uid) {
                grants.push(grant);
                touched.push(uid);
            }
        }
        for &uid in &touched {
            game.emit(ctx.controller, event, (!uid.is_player()).then_some(uid), 0);
        }
        touched
    }

    fn take_control(game: &mut Match, me: PlayerId, uid: EntityId) -> Result<bool> {
        let Some((holder, zone)) = game.zones.location(uid) else {
            return Ok(false);
        };
        if !zone.is_board() || holder == me {
            return Ok(false);
        }
        game.relocate(uid, me, zone, ZonePosition::Top)?;
        game.require_card_mut(uid)?.summoning_sick = true;
        game.emit(me, EventKind::ControlChanged, Some(uid), 0);
        Ok(true)
    }

    fn place_peeked(
        game: &mut Match,
        me: PlayerId,
        destinations: &[(EntityId, DeckDestination)],
    ) -> Result<Vec<EntityId>> {
        let mut placed = Vec::with_capacity(destinations.len());
        for &(uid, destination) in destinations {
            match destination {
                DeckDestination::Top => {
                    game.relocate(uid, me, Zone::Deck, ZonePosition::Top)?;
                }
                DeckDestination::Bottom => {
                    game.relocate(uid, me, Zone::Deck, ZonePosition::Bottom)?;
                }
                DeckDestination::Hand => {
                    game.relocate(uid, me, Zone::Hand, ZonePosition::Top)?;
                    let own = ClientEvent::new(EventKind::CardMoved)
                        .with_card(game.snapshot(uid))
                        .with_uids([uid]);
                    game.events.split(me, own, ClientEvent::new(EventKind::CardMoved));
                }
                DeckDestination::Graveyard => {
                    game.bury(uid)?;
                    game.emit(me, EventKind::CardMoved, Some(uid), 0);
                }
            }
            placed.push(uid);
        }
        Ok(placed)
    }

    /// Lowest attack first, then lowest uid.
    fn weakest(game: &Match, player: PlayerId, count: usize) -> Vec<EntityId> {
        let mut board: Vec<EntityId> = game.zones.board(player).collect();
        board.sort_by_key(|&uid| (game.attack(uid), uid));
        board.truncate(count);
        board
    }

    fn arm(game: &mut Match, ctx: &ResolveContext, trigger: &TriggerDefinition) {
        let mut trigger = trigger.clone();
        if trigger.source.is_none() {
            trigger.bind_source(ctx.source);
        }
        game.delayed.push(DelayedTrigger {
            controller: ctx.controller,
            trigger,
        });
        let event = ClientEvent::new(EventKind::DelayedTriggerArmed).with_uids([ctx.source]);
        game.events.public(ctx.controller, event);
    }
}

/// Internal result of applying an effect kind.
enum Applied {
    Done(Vec<EntityId>),
    Wait(ResolutionRequest),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, TokenKind, Tribe};
    use crate::effects::{Amount, AmountBasis, Scope, TargetFilter};
    use crate::engine::test_support::{grunt_id, knight_id, MatchFixture};

    fn run(fixture: &mut MatchFixture, source: EntityId, effect: &mut Effect) -> EffectOutcome {
        let controller = fixture.game.controller_of(source).unwrap_or(fixture.p0());
        let ctx = ResolveContext::new(source, controller);
        EffectResolver::execute(&mut fixture.game, &ctx, effect, None).unwrap()
    }

    #[test]
    fn test_damage_to_chosen_creature() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let knight = fixture.put_on_board(p1, knight_id());

        let mut effect = Effect::new(EffectKind::Damage, TargetType::Creature)
            .with_fixed(2)
            .bound_to(source);
        effect.targets = vec![knight];

        assert_eq!(run(&mut fixture, source, &mut effect), EffectOutcome::Applied);
        assert_eq!(fixture.game.card(knight).unwrap().damage, 2);
        assert_eq!(effect.affected, vec![knight]);
    }

    #[test]
    fn test_heal_creature_reports_amount_removed() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let knight = fixture.put_on_board(p0, knight_id());
        fixture.game.card_mut(knight).unwrap().damage = 2;
        fixture.game.drain_events(p1);

        let mut effect = Effect::new(EffectKind::Heal, TargetType::FriendlyCreature)
            .with_fixed(5)
            .bound_to(source);
        effect.targets = vec![knight];
        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.card(knight).unwrap().damage, 0);
        let healed = fixture
            .game
            .drain_events(p1)
            .into_iter()
            .find(|e| e.kind == EventKind::CreatureHealed)
            .unwrap();
        assert_eq!(healed.uids, vec![knight]);
        assert_eq!(healed.amount, 2);
        assert_eq!(healed.card.unwrap().uid, knight);
    }

    #[test]
    fn test_gone_target_fizzles() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let knight = fixture.put_on_board(p1, knight_id());
        let mut effect = Effect::new(EffectKind::Destroy, TargetType::Creature).bound_to(source);
        effect.targets = vec![knight];
        fixture.game.destroy(knight).unwrap();

        let outcome = run(&mut fixture, source, &mut effect);
        assert!(matches!(outcome, EffectOutcome::Fizzled(_)));
    }

    #[test]
    fn test_amount_error_fizzles() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let source = fixture.put_on_board(p0, grunt_id());
        let before = fixture.game.life(p0.opponent());
        let mut effect = Effect::new(EffectKind::Damage, TargetType::Opponent)
            .with_amount(Amount::based_on(AmountBasis::TargetAttack))
            .bound_to(source);

        let outcome = run(&mut fixture, source, &mut effect);

        assert!(matches!(outcome, EffectOutcome::Fizzled(_)));
        assert_eq!(fixture.game.life(p0.opponent()), before);
    }

    #[test]
    fn test_mass_destroy_with_scope() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let friend = fixture.put_on_board(p0, knight_id());
        let enemy = fixture.put_on_board(p1, knight_id());
        let mut effect = Effect::new(EffectKind::Destroy, TargetType::AllCreatures)
            .with_filter(TargetFilter::any().with_scope(Scope::OthersOnly))
            .bound_to(source);

        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.zone_of(source), Some(Zone::Play));
        assert_eq!(fixture.game.zone_of(friend), Some(Zone::Graveyard));
        assert_eq!(fixture.game.zone_of(enemy), Some(Zone::Graveyard));
    }

    #[test]
    fn test_additional_runs_per_affected() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, knight_id());
        for _ in 0..3 {
            fixture.put_in_deck(p0, grunt_id());
        }
        fixture.put_on_board(p1, grunt_id());
        fixture.put_on_board(p1, grunt_id());

        let mut effect = Effect::new(EffectKind::Destroy, TargetType::AllEnemy)
            .with_additional(Effect::new(EffectKind::Draw, TargetType::Controller))
            .per_affected()
            .bound_to(source);

        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.cards_in(p0, Zone::Hand).len(), 2);
        assert_eq!(fixture.game.zones.board(p1).count(), 0);
    }

    #[test]
    fn test_parent_affected_amount() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, knight_id());
        fixture.put_on_board(p1, grunt_id());
        fixture.put_on_board(p1, grunt_id());
        let before = fixture.game.life(p1);

        let mut effect = Effect::new(EffectKind::Destroy, TargetType::AllEnemy)
            .with_additional(
                Effect::new(EffectKind::LoseLife, TargetType::Opponent)
                    .with_amount(Amount::based_on(AmountBasis::ParentAffected)),
            )
            .bound_to(source);

        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.life(p1), before - 2);
    }

    #[test]
    fn test_chosen_amount_suspends_then_uses_answer() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let source = fixture.put_on_board(p0, knight_id());
        let before = fixture.game.life(p0.opponent());
        let mut effect = Effect::new(EffectKind::Damage, TargetType::Opponent)
            .with_fixed(4)
            .with_chosen_amount()
            .bound_to(source);
        let ctx = ResolveContext::new(source, p0);

        let first = EffectResolver::execute(&mut fixture.game, &ctx, &mut effect, None).unwrap();
        assert_eq!(first, EffectOutcome::Suspended(ResolutionRequest::Amount { max: 4 }));
        assert_eq!(fixture.game.life(p0.opponent()), before);

        let second = EffectResolver::execute(
            &mut fixture.game,
            &ctx,
            &mut effect,
            Some(ResolutionAnswer::Amount(3)),
        )
        .unwrap();
        assert_eq!(second, EffectOutcome::Applied);
        assert_eq!(fixture.game.life(p0.opponent()), before - 3);
    }

    #[test]
    fn test_tutor_suspends_with_matching_cards() {
        let goblin_only = TargetFilter::any().with_tribe(Tribe::Goblin);
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let source = fixture.put_on_board(p0, knight_id());
        let grunt = fixture.put_in_deck(p0, grunt_id());
        fixture.put_in_deck(p0, knight_id());
        let mut effect = Effect::new(EffectKind::Tutor, TargetType::Controller)
            .with_filter(goblin_only)
            .bound_to(source);
        let ctx = ResolveContext::new(source, p0);

        let outcome = EffectResolver::execute(&mut fixture.game, &ctx, &mut effect, None).unwrap();
        assert_eq!(
            outcome,
            EffectOutcome::Suspended(ResolutionRequest::Tutor {
                candidates: vec![grunt],
                count: 1
            })
        );

        let outcome = EffectResolver::execute(
            &mut fixture.game,
            &ctx,
            &mut effect,
            Some(ResolutionAnswer::Cards(vec![grunt])),
        )
        .unwrap();
        assert_eq!(outcome, EffectOutcome::Applied);
        assert_eq!(fixture.game.zone_of(grunt), Some(Zone::Hand));
    }

    #[test]
    fn test_take_control_keeps_owner() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let knight = fixture.put_on_board(p1, knight_id());
        let mut effect = Effect::new(EffectKind::TakeControl, TargetType::EnemyCreature).bound_to(source);
        effect.targets = vec![knight];

        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.controller_of(knight), Some(p0));
        assert_eq!(fixture.game.card(knight).unwrap().owner, p1);
        assert!(fixture.game.card(knight).unwrap().summoning_sick);
    }

    #[test]
    fn test_sacrifice_takes_weakest() {
        let mut fixture = MatchFixture::new();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let weak = fixture.put_on_board(p1, CardId::new(3));
        let strong = fixture.put_on_board(p1, knight_id());
        let mut effect = Effect::new(EffectKind::Sacrifice, TargetType::Opponent).bound_to(source);

        run(&mut fixture, source, &mut effect);

        assert_eq!(fixture.game.zone_of(weak), Some(Zone::Graveyard));
        assert_eq!(fixture.game.zone_of(strong), Some(Zone::Play));
    }

    #[test]
    fn test_token_summon_and_reveal() {
        let mut fixture = MatchFixture::with_extra(vec![CardDefinition::spell(
            CardId::new(950),
            "Secret",
            1,
        )]);
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let source = fixture.put_on_board(p0, grunt_id());
        let secret = fixture.put_in_hand(p1, CardId::new(950));

        let mut tokens = Effect::new(EffectKind::SummonToken(TokenKind::Skeleton), TargetType::Controller)
            .with_fixed(2)
            .bound_to(source);
        run(&mut fixture, source, &mut tokens);
        assert_eq!(fixture.game.cards_in(p0, Zone::Tokens).len(), 2);

        fixture.game.drain_events(p0);
        fixture.game.drain_events(p1);
        let mut reveal = Effect::new(EffectKind::Reveal, TargetType::Opponent).bound_to(source);
        run(&mut fixture, source, &mut reveal);

        let seen = fixture.game.drain_events(p0);
        let notice = fixture.game.drain_events(p1);
        assert!(seen.iter().any(|e| e.kind == EventKind::Revealed && e.uids == vec![secret]));
        assert!(notice.iter().all(|e| e.card.is_none()));
        assert!(notice.iter().any(|e| e.kind == EventKind::RevealNotice));
    }
}
