//! Resolving the top of the stack.

use tracing::debug;

use super::Match;
use crate::core::Phase;
use crate::effects::{EffectOutcome, EffectResolver, ResolveContext};
use crate::error::{EngineError, Result};
use crate::events::EventKind;
use crate::negotiation::{PendingInteraction, ResolutionRequest};
use crate::stack::{ResolutionAnswer, StackObj, StackOrigin};
use crate::zones::Zone;

impl Match {
    /// Resolve the top entry from its resume index. A request puts the
    /// entry back on the stack; the answer resumes it at the same index.
    pub(crate) fn resolve_top(&mut self) -> Result<()> {
        let mut entry = self
            .stack
            .pop()
            .ok_or_else(|| EngineError::invariant("resolve requested on an empty stack"))?;
        let mut answer = entry.answer.take();
        let ctx = ResolveContext::new(entry.source, entry.controller)
            .with_x(entry.x)
            .with_subject(entry.subject);

        while let Some(effect) = entry.effects.get_mut(entry.resume_index) {
            if effect.optional {
                match answer.take() {
                    Some(ResolutionAnswer::Optional(false)) => {
                        debug!(source = %entry.source, index = entry.resume_index, "optional effect declined");
                        entry.resume_index += 1;
                        continue;
                    }
                    Some(ResolutionAnswer::Optional(true)) => effect.optional = false,
                    _ => return self.suspend(entry, ResolutionRequest::Optional),
                }
            }

            match EffectResolver::execute(self, &ctx, effect, answer.take())? {
                EffectOutcome::Applied => {}
                EffectOutcome::Fizzled(reason) => EffectResolver::report_fizzle(self, &ctx, &reason),
                EffectOutcome::Suspended(request) => return self.suspend(entry, request),
            }
            entry.resume_index += 1;
            if self.outcome.is_some() {
                return Ok(());
            }
        }

        self.finish_resolution(entry)
    }

    fn suspend(&mut self, entry: StackObj, request: ResolutionRequest) -> Result<()> {
        debug!(source = %entry.source, index = entry.resume_index, ?request, "resolution suspended");
        let controller = entry.controller;
        self.stack.push(entry);
        self.request(controller, PendingInteraction::Resolution(request));
        Ok(())
    }

    fn finish_resolution(&mut self, entry: StackObj) -> Result<()> {
        let StackObj {
            source,
            controller,
            origin,
            ..
        } = entry;
        debug!(%source, ?origin, "stack entry resolved");
        self.emit(controller, EventKind::StackResolved, Some(source), 0);

        let still_on_stack = self.zones.is_in(source, Zone::Stack);
        match origin {
            StackOrigin::Spell if still_on_stack => {
                self.bury(source)?;
            }
            StackOrigin::Summon if still_on_stack => {
                self.enter_play(source, controller)?;
                self.check_state()?;
                if self.definition(source)?.enters_attacking && self.phase == Phase::Combat {
                    let candidates = self.attack_targets(source);
                    if !candidates.is_empty() {
                        self.request(
                            controller,
                            PendingInteraction::AttackTarget {
                                attacker: source,
                                candidates,
                            },
                        );
                    }
                }
            }
            _ => {}
        }

        self.check_state()?;
        self.priority.reset_to(self.active);
        self.settle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::EntityId;
    use crate::effects::{Effect, EffectKind, TargetType};
    use crate::engine::test_support::{bolt_id, grunt_id, MatchFixture};

    fn omen_id() -> CardId {
        CardId::new(830)
    }

    fn raider_id() -> CardId {
        CardId::new(831)
    }

    fn fixture() -> MatchFixture {
        MatchFixture::with_extra(vec![
            CardDefinition::spell(omen_id(), "Omen", 1)
                .with_effect(Effect::new(EffectKind::Draw, TargetType::Controller).optional())
                .with_effect(Effect::new(EffectKind::LoseLife, TargetType::Opponent).with_fixed(2)),
            CardDefinition::summon(raider_id(), "Raider", 1, 3, 1).entering_attacking(),
        ])
    }

    fn pass_both(fixture: &mut MatchFixture) {
        let first = fixture.game.priority_player().unwrap();
        fixture.game.pass_priority(first).unwrap();
        fixture.game.pass_priority(first.opponent()).unwrap();
    }

    #[test]
    fn test_spell_resolves_then_goes_to_graveyard() {
        let mut fixture = fixture();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let bolt = fixture.put_in_hand(p0, bolt_id());

        fixture.game.attempt_to_cast(p0, bolt).unwrap();
        fixture.game.select_target(p0, &[EntityId::player(p1)]).unwrap();
        pass_both(&mut fixture);

        assert_eq!(fixture.game.life(p1), 17);
        assert_eq!(fixture.game.zone_of(bolt), Some(Zone::Graveyard));
        assert!(fixture.game.stack().is_empty());
        assert_eq!(fixture.game.priority_player(), Some(p0));
    }

    #[test]
    fn test_declined_optional_resumes_at_next_effect() {
        let mut fixture = fixture();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        fixture.put_in_deck(p0, grunt_id());
        let omen = fixture.put_in_hand(p0, omen_id());

        fixture.game.attempt_to_cast(p0, omen).unwrap();
        pass_both(&mut fixture);
        assert!(matches!(
            fixture.game.pending().map(|p| &p.interaction),
            Some(PendingInteraction::Resolution(ResolutionRequest::Optional))
        ));
        assert_eq!(fixture.game.stack().len(), 1);

        fixture.game.make_choice(p0, 1).unwrap();

        assert_eq!(fixture.game.cards_in(p0, Zone::Hand).len(), 0);
        assert_eq!(fixture.game.life(p1), 18);
        assert_eq!(fixture.game.zone_of(omen), Some(Zone::Graveyard));
    }

    #[test]
    fn test_accepted_optional_runs_once() {
        let mut fixture = fixture();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        fixture.put_in_deck(p0, grunt_id());
        let omen = fixture.put_in_hand(p0, omen_id());

        fixture.game.attempt_to_cast(p0, omen).unwrap();
        pass_both(&mut fixture);
        fixture.game.make_choice(p0, 0).unwrap();

        assert_eq!(fixture.game.cards_in(p0, Zone::Hand).len(), 1);
        assert_eq!(fixture.game.life(p1), 18);
    }

    #[test]
    fn test_summon_enters_play_on_resolve() {
        let mut fixture = fixture();
        let p0 = fixture.p0();
        let grunt = fixture.put_in_hand(p0, grunt_id());

        fixture.game.attempt_to_cast(p0, grunt).unwrap();
        fixture.game.drain_events(p0);
        pass_both(&mut fixture);

        assert_eq!(fixture.game.zone_of(grunt), Some(Zone::Play));
        assert!(fixture.game.card(grunt).unwrap().summoning_sick);
        let kinds: Vec<EventKind> = fixture.game.drain_events(p0).into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::StackResolved));
    }

    #[test]
    fn test_enters_attacking_in_combat_asks_for_target() {
        let mut fixture = fixture();
        let (p0, p1) = (fixture.p0(), fixture.p1());
        let raider = fixture.put_in_hand(p0, raider_id());

        fixture.game.attempt_to_cast(p0, raider).unwrap();
        fixture.game.phase = Phase::Combat;
        pass_both(&mut fixture);

        match fixture.game.pending().map(|p| &p.interaction) {
            Some(PendingInteraction::AttackTarget { attacker, candidates }) => {
                assert_eq!(*attacker, raider);
                assert_eq!(candidates, &vec![EntityId::player(p1)]);
            }
            other => panic!("unexpected pending {:?}", other),
        }
        fixture.game.assign_attack(p0, &[(raider, EntityId::player(p1))]).unwrap();
        assert!(fixture.game.pending().is_none());
        assert_eq!(fixture.game.attacks.committed, vec![(raider, EntityId::player(p1))]);
    }
}
