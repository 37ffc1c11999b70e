//! Trigger detection.
//!
//! For one queued `TriggerContext`, collect every trigger that fires, per
//! player, active player first. Sources are searched in this order:
//!
//! 1. hand cards with hand-active triggers
//! 2. board cards
//! 3. the departed subject of a Death / LeftPlay / Mill event, attributed
//!    to the controller it had when it left
//! 4. armed delayed triggers (consumed when they fire)

use tracing::debug;

use super::definition::{PendingTrigger, TriggerDefinition, TriggerSubject};
use super::event::{TriggerContext, TriggerEvent};
use crate::cards::BindSource;
use crate::core::{EntityId, PlayerId, PlayerMap};
use crate::effects::{qualify, ConditionContext, ConditionEvaluator, Qualifier};
use crate::engine::Match;
use crate::zones::Zone;

/// What one detection pass found.
#[derive(Debug, Default)]
pub struct Detection {
    pub fired: PlayerMap<Vec<PendingTrigger>>,
    /// Indices into `Match::delayed` that fired and must be disarmed.
    pub spent_delayed: Vec<usize>,
}

impl Detection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired.iter().all(|(_, t)| t.is_empty())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.fired.iter().map(|(_, t)| t.len()).sum()
    }
}

/// Finds triggers matching a context.
pub struct TriggerDetector;

impl TriggerDetector {
    pub fn detect(game: &Match, ctx: &TriggerContext) -> Detection {
        let mut detection = Detection::default();

        for player in game.active.and_opponent() {
            let fired = detection.fired.get_mut(player);

            for &uid in game.zones.cards(player, Zone::Hand) {
                Self::collect_from_card(game, ctx, player, uid, true, fired);
            }
            for uid in game.zones.board(player) {
                Self::collect_from_card(game, ctx, player, uid, false, fired);
            }

            if let Some(subject) = ctx.subject {
                if ctx.event.subject_departed() && Self::departed_from(game, ctx, subject, player) {
                    Self::collect_from_card(game, ctx, player, subject, false, fired);
                }
            }

            for (index, delayed) in game.delayed.iter().enumerate() {
                if delayed.controller != player {
                    continue;
                }
                let source = delayed
                    .trigger
                    .source
                    .unwrap_or_else(|| EntityId::player(player));
                if Self::matches(game, ctx, player, source, &delayed.trigger) {
                    fired.push(Self::pending(ctx, player, source, &delayed.trigger));
                    detection.spent_delayed.push(index);
                }
            }
        }

        if !detection.is_empty() {
            debug!(event = %ctx.event, fired = detection.total(), "triggers detected");
        }
        detection
    }

    /// Did `subject` leave its zone on `player`'s side?
    ///
    /// Board departures use the controller it left from; a milled card never
    /// had one, so it belongs to the milled player.
    fn departed_from(game: &Match, ctx: &TriggerContext, subject: EntityId, player: PlayerId) -> bool {
        let Some(card) = game.card(subject) else {
            return false;
        };
        if game.zones.on_board(subject) {
            return false;
        }
        let side = match ctx.event {
            TriggerEvent::Mill => ctx.player.or(Some(card.owner)),
            _ => card.last_controller,
        };
        side == Some(player)
    }

    fn collect_from_card(
        game: &Match,
        ctx: &TriggerContext,
        player: PlayerId,
        uid: EntityId,
        in_hand: bool,
        out: &mut Vec<PendingTrigger>,
    ) {
        let Ok(definition) = game.definition(uid) else {
            return;
        };
        for trigger in &definition.triggers {
            if trigger.active_in_hand == in_hand && Self::matches(game, ctx, player, uid, trigger) {
                out.push(Self::pending(ctx, player, uid, trigger));
            }
        }
    }

    fn pending(
        ctx: &TriggerContext,
        controller: PlayerId,
        source: EntityId,
        trigger: &TriggerDefinition,
    ) -> PendingTrigger {
        PendingTrigger {
            source,
            controller,
            effects: trigger.effects.bound_to(source),
            event: ctx.event,
            subject: ctx.subject,
        }
    }

    /// Which side the event is about.
    fn event_side(game: &Match, ctx: &TriggerContext) -> Option<PlayerId> {
        match ctx.subject {
            Some(subject) => match subject.as_player() {
                Some(player) => Some(player),
                None => game
                    .zones
                    .controller(subject)
                    .filter(|_| !game.zones.is_in(subject, Zone::Graveyard))
                    .or_else(|| game.card(subject).and_then(|c| c.last_controller))
                    .or_else(|| game.card(subject).map(|c| c.owner)),
            },
            None => ctx.player,
        }
    }

    pub(crate) fn matches(
        game: &Match,
        ctx: &TriggerContext,
        player: PlayerId,
        source: EntityId,
        trigger: &TriggerDefinition,
    ) -> bool {
        if trigger.event != ctx.event {
            return false;
        }

        let subject_ok = match trigger.subject {
            TriggerSubject::SelfCard => ctx.subject == Some(source),
            TriggerSubject::Friendly => Self::event_side(game, ctx) == Some(player),
            TriggerSubject::Enemy => Self::event_side(game, ctx) == Some(player.opponent()),
            TriggerSubject::Any => true,
        };
        if !subject_ok {
            return false;
        }

        if let Some(subject) = ctx.subject {
            let q = Qualifier::new(player, Some(source), &trigger.filter);
            if !qualify(game, subject, &q) {
                return false;
            }
        }

        let conditions = ConditionContext::new(game, player)
            .with_source(Some(source))
            .with_subject(ctx.subject);
        ConditionEvaluator::all(&trigger.conditions, &conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::Phase;
    use crate::effects::{Effect, EffectKind, TargetType};
    use crate::engine::test_support::{grunt_id, MatchFixture};
    use crate::zones::ZonePosition;

    fn draw_effect() -> Effect {
        Effect::new(EffectKind::Draw, TargetType::Controller)
    }

    fn mourner() -> CardDefinition {
        CardDefinition::summon(CardId::new(700), "Mourner", 2, 1, 2).with_trigger(
            TriggerDefinition::new(TriggerEvent::Death)
                .with_subject(TriggerSubject::Friendly)
                .with_effect(draw_effect()),
        )
    }

    fn martyr() -> CardDefinition {
        CardDefinition::summon(CardId::new(701), "Martyr", 1, 1, 1).with_trigger(
            TriggerDefinition::new(TriggerEvent::Death)
                .with_subject(TriggerSubject::SelfCard)
                .with_effect(draw_effect()),
        )
    }

    fn herald() -> CardDefinition {
        CardDefinition::spell(CardId::new(702), "Herald", 3).with_trigger(
            TriggerDefinition::new(TriggerEvent::Phase(Phase::End))
                .with_effect(draw_effect())
                .in_hand(),
        )
    }

    fn kill(fixture: &mut MatchFixture, uid: EntityId) {
        let game = &mut fixture.game;
        let controller = game.zones.controller(uid).unwrap();
        let owner = game.card(uid).unwrap().owner;
        game.card_mut(uid).unwrap().last_controller = Some(controller);
        game.zones
            .move_to(uid, owner, Zone::Graveyard, ZonePosition::Top)
            .unwrap();
    }

    #[test]
    fn test_friendly_death_seen_by_controller_only() {
        let mut fixture = MatchFixture::with_extra(vec![mourner()]);
        let (p0, p1) = (fixture.p0(), fixture.p1());
        fixture.put_on_board(p0, CardId::new(700));
        fixture.put_on_board(p1, CardId::new(700));
        let grunt = fixture.put_on_board(p0, grunt_id());
        kill(&mut fixture, grunt);

        let ctx = TriggerContext::about(TriggerEvent::Death, grunt);
        let detection = TriggerDetector::detect(&fixture.game, &ctx);

        assert_eq!(detection.fired[p0].len(), 1);
        assert!(detection.fired[p1].is_empty());
    }

    #[test]
    fn test_departed_subject_fires_its_own_trigger() {
        let mut fixture = MatchFixture::with_extra(vec![martyr()]);
        let p0 = fixture.p0();
        let uid = fixture.put_on_board(p0, CardId::new(701));
        kill(&mut fixture, uid);

        let ctx = TriggerContext::about(TriggerEvent::Death, uid);
        let detection = TriggerDetector::detect(&fixture.game, &ctx);

        let fired = &detection.fired[p0];
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].source, uid);
        assert_eq!(fired[0].effects[0].source, Some(uid));
    }

    #[test]
    fn test_hand_trigger_only_from_hand() {
        let mut fixture = MatchFixture::with_extra(vec![herald()]);
        let (p0, p1) = (fixture.p0(), fixture.p1());
        fixture.put_in_hand(p0, CardId::new(702));
        fixture.put_on_board(p1, CardId::new(702));

        let ctx = TriggerContext::new(TriggerEvent::Phase(Phase::End)).with_player(p0);
        let detection = TriggerDetector::detect(&fixture.game, &ctx);

        assert_eq!(detection.fired[p0].len(), 1);
        assert!(detection.fired[p1].is_empty());
    }

    #[test]
    fn test_wrong_event_ignored() {
        let mut fixture = MatchFixture::with_extra(vec![mourner()]);
        let p0 = fixture.p0();
        let uid = fixture.put_on_board(p0, CardId::new(700));

        let ctx = TriggerContext::about(TriggerEvent::Summon, uid);
        assert!(TriggerDetector::detect(&fixture.game, &ctx).is_empty());
    }

    #[test]
    fn test_delayed_trigger_is_spent() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let source = fixture.put_on_board(p0, grunt_id());
        fixture.game.delayed.push(crate::triggers::DelayedTrigger {
            controller: p0,
            trigger: TriggerDefinition::new(TriggerEvent::Cast)
                .with_effect(draw_effect())
                .bound_to(source),
        });

        let ctx = TriggerContext::new(TriggerEvent::Cast).with_player(p0);
        let detection = TriggerDetector::detect(&fixture.game, &ctx);

        assert_eq!(detection.spent_delayed, vec![0]);
        assert_eq!(detection.fired[p0][0].source, source);
    }
}
