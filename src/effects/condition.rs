//! Conditions gating effects, triggers, passives and casts.
//!
//! Conditions are evaluated against the live match from the point of view
//! of a controller, an optional source card, and an optional subject (the
//! candidate being qualified, or the card an event is about).

use serde::{Deserialize, Serialize};

use crate::cards::Tribe;
use crate::core::{EntityId, Phase, PlayerId};
use crate::engine::Match;
use crate::zones::Zone;

/// A predicate over match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    // === Life ===
    ControllerLifeAtLeast(i32),
    ControllerLifeAtMost(i32),
    OpponentLifeAtMost(i32),

    // === Board ===
    ControlsTribe { tribe: Tribe, count: usize },
    ControlsCreatures(usize),
    OpponentControlsCreatures(usize),

    // === Cards ===
    HandSizeAtLeast(usize),
    GraveyardSizeAtLeast(usize),
    CardsCastThisTurnAtLeast(u32),

    // === Turn ===
    YourTurn,
    OpponentsTurn,
    PhaseIs(Phase),

    // === Source / subject ===
    SourceOnBoard,
    SourceDamaged,
    SubjectDamaged,
    SubjectIsToken,
    SubjectIsSource,

    // === Combinators ===
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Add another condition with OR.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Any(mut conditions) => {
                conditions.push(other);
                Self::Any(conditions)
            }
            _ => Self::Any(vec![self, other]),
        }
    }
}

/// Context for evaluating conditions.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    pub game: &'a Match,
    pub controller: PlayerId,
    pub source: Option<EntityId>,
    pub subject: Option<EntityId>,
}

impl<'a> ConditionContext<'a> {
    pub fn new(game: &'a Match, controller: PlayerId) -> Self {
        Self {
            game,
            controller,
            source: None,
            subject: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<EntityId>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Option<EntityId>) -> Self {
        self.subject = subject;
        self
    }
}

/// Evaluator for conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check every condition in a list. An empty list holds.
    pub fn all(conditions: &[Condition], ctx: &ConditionContext<'_>) -> bool {
        conditions.iter().all(|c| Self::evaluate(c, ctx))
    }

    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &Condition, ctx: &ConditionContext<'_>) -> bool {
        let game = ctx.game;
        let me = ctx.controller;
        let opponent = me.opponent();

        match condition {
            Condition::ControllerLifeAtLeast(n) => game.players[me].life >= *n,
            Condition::ControllerLifeAtMost(n) => game.players[me].life <= *n,
            Condition::OpponentLifeAtMost(n) => game.players[opponent].life <= *n,

            Condition::ControlsTribe { tribe, count } => {
                game.zones
                    .board(me)
                    .filter(|&uid| game.tribe_of(uid) == Some(*tribe))
                    .count()
                    >= *count
            }
            Condition::ControlsCreatures(n) => game.zones.board(me).count() >= *n,
            Condition::OpponentControlsCreatures(n) => game.zones.board(opponent).count() >= *n,

            Condition::HandSizeAtLeast(n) => game.zones.size(me, Zone::Hand) >= *n,
            Condition::GraveyardSizeAtLeast(n) => game.zones.size(me, Zone::Graveyard) >= *n,
            Condition::CardsCastThisTurnAtLeast(n) => game.players[me].cards_cast_this_turn >= *n,

            Condition::YourTurn => game.active == me,
            Condition::OpponentsTurn => game.active == opponent,
            Condition::PhaseIs(phase) => game.phase == *phase,

            Condition::SourceOnBoard => ctx.source.is_some_and(|s| game.zones.on_board(s)),
            Condition::SourceDamaged => ctx
                .source
                .and_then(|s| game.card(s))
                .is_some_and(|c| c.damage > 0),
            Condition::SubjectDamaged => ctx
                .subject
                .and_then(|s| game.card(s))
                .is_some_and(|c| c.damage > 0),
            Condition::SubjectIsToken => ctx
                .subject
                .and_then(|s| game.card(s))
                .is_some_and(|c| c.token),
            Condition::SubjectIsSource => ctx.subject.is_some() && ctx.subject == ctx.source,

            Condition::All(conditions) => Self::all(conditions, ctx),
            Condition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, ctx)),
            Condition::Not(inner) => !Self::evaluate(inner, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{board_with, grunt_id, MatchFixture};

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    #[test]
    fn test_life_conditions() {
        let fixture = MatchFixture::new();
        let ctx = ConditionContext::new(&fixture.game, P0);

        assert!(ConditionEvaluator::evaluate(&Condition::ControllerLifeAtLeast(20), &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::ControllerLifeAtMost(10), &ctx));
        assert!(ConditionEvaluator::evaluate(&Condition::OpponentLifeAtMost(20), &ctx));
    }

    #[test]
    fn test_board_conditions() {
        let (game, _) = board_with(&[grunt_id(), grunt_id()], &[]);
        let mine = ConditionContext::new(&game, P0);
        let theirs = ConditionContext::new(&game, P1);

        let two_goblins = Condition::ControlsTribe {
            tribe: Tribe::Goblin,
            count: 2,
        };
        assert!(ConditionEvaluator::evaluate(&two_goblins, &mine));
        assert!(!ConditionEvaluator::evaluate(&two_goblins, &theirs));
        assert!(ConditionEvaluator::evaluate(&Condition::OpponentControlsCreatures(2), &theirs));
    }

    #[test]
    fn test_turn_conditions() {
        let fixture = MatchFixture::new();
        let active = fixture.game.active_player();
        let ctx = ConditionContext::new(&fixture.game, active);
        let other = ConditionContext::new(&fixture.game, active.opponent());

        assert!(ConditionEvaluator::evaluate(&Condition::YourTurn, &ctx));
        assert!(ConditionEvaluator::evaluate(&Condition::OpponentsTurn, &other));
    }

    #[test]
    fn test_combinators() {
        let fixture = MatchFixture::new();
        let ctx = ConditionContext::new(&fixture.game, P0);

        let yes = Condition::ControllerLifeAtLeast(1);
        let no = Condition::ControllerLifeAtMost(0);

        assert!(ConditionEvaluator::evaluate(&yes.clone().or(no.clone()), &ctx));
        assert!(!ConditionEvaluator::evaluate(&yes.clone().and(no.clone()), &ctx));
        assert!(ConditionEvaluator::evaluate(&no.clone().negate(), &ctx));
        assert!(ConditionEvaluator::all(&[], &ctx));
    }

    #[test]
    fn test_subject_conditions() {
        let (game, uids) = board_with(&[grunt_id()], &[]);
        let ctx = ConditionContext::new(&game, P0)
            .with_source(Some(uids[0]))
            .with_subject(Some(uids[0]));

        assert!(ConditionEvaluator::evaluate(&Condition::SubjectIsSource, &ctx));
        assert!(ConditionEvaluator::evaluate(&Condition::SourceOnBoard, &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::SubjectDamaged, &ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::SubjectIsToken, &ctx));
    }
}
