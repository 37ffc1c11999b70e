//! Qualifier: the shared filter predicate.
//!
//! Effects, triggers, passives and costs all describe "which things" with
//! the same fields. A `Qualifier` bundles those fields with the point of
//! view (source and controller) and `qualify` tests one candidate against
//! it, in a fixed order, stopping at the first failure:
//!
//! 1. declared conditions
//! 2. passive dedupe (candidate already holds this grant)
//! 3. scope relative to the source
//! 4. tribe
//! 5. card kind
//! 6. restriction list
//! 7. token subtype
//!
//! `qualify` only reads the match.

use super::condition::{Condition, ConditionContext, ConditionEvaluator};
use super::effect::{Restriction, Scope, TargetFilter};
use crate::core::{EntityId, PlayerId};
use crate::engine::Match;

/// Ephemeral query built from a construct's filter fields.
#[derive(Clone, Copy, Debug)]
pub struct Qualifier<'a> {
    pub source: Option<EntityId>,
    pub controller: PlayerId,
    pub filter: &'a TargetFilter,
    pub conditions: &'a [Condition],
    /// (source, aura index) of a passive being applied.
    pub dedupe: Option<(EntityId, usize)>,
}

impl<'a> Qualifier<'a> {
    pub fn new(controller: PlayerId, source: Option<EntityId>, filter: &'a TargetFilter) -> Self {
        Self {
            source,
            controller,
            filter,
            conditions: &[],
            dedupe: None,
        }
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: &'a [Condition]) -> Self {
        self.conditions = conditions;
        self
    }

    #[must_use]
    pub fn with_dedupe(mut self, source: EntityId, index: usize) -> Self {
        self.dedupe = Some((source, index));
        self
    }
}

/// Does `candidate` match the qualifier?
pub fn qualify(game: &Match, candidate: EntityId, q: &Qualifier<'_>) -> bool {
    let ctx = ConditionContext::new(game, q.controller)
        .with_source(q.source)
        .with_subject(Some(candidate));
    if !ConditionEvaluator::all(q.conditions, &ctx) {
        return false;
    }

    if let Some((source, index)) = q.dedupe {
        if game.holds_grant(candidate, source, index) {
            return false;
        }
    }

    let is_source = q.source == Some(candidate);
    match q.filter.scope {
        Scope::All => {}
        Scope::SelfOnly if !is_source => return false,
        Scope::OthersOnly if is_source => return false,
        _ => {}
    }

    let definition = if candidate.is_player() {
        None
    } else {
        game.definition(candidate).ok()
    };

    if let Some(tribe) = q.filter.tribe {
        if definition.and_then(|d| d.tribe) != Some(tribe) {
            return false;
        }
    }

    if let Some(kind) = q.filter.card_kind {
        if definition.map(|d| d.kind) != Some(kind) {
            return false;
        }
    }

    if !q
        .filter
        .restrictions
        .iter()
        .all(|r| restriction_holds(game, candidate, q.controller, *r))
    {
        return false;
    }

    if let Some(token) = q.filter.token {
        if definition.and_then(|d| d.token) != Some(token) {
            return false;
        }
    }

    true
}

fn restriction_holds(game: &Match, candidate: EntityId, controller: PlayerId, r: Restriction) -> bool {
    let owner_side = match candidate.as_player() {
        Some(p) => Some(p),
        None => game.zones.controller(candidate),
    };
    let card = game.card(candidate);

    match r {
        Restriction::Friendly => owner_side == Some(controller),
        Restriction::Enemy => owner_side == Some(controller.opponent()),
        Restriction::Card => card.is_some(),
        Restriction::Player => candidate.is_player(),
        Restriction::MaxCost(n) => game.base_cost(candidate).is_some_and(|c| c <= n),
        Restriction::MinCost(n) => game.base_cost(candidate).is_some_and(|c| c >= n),
        Restriction::MaxAttack(n) => card.is_some() && game.attack(candidate) <= n,
        Restriction::MinAttack(n) => card.is_some() && game.attack(candidate) >= n,
        Restriction::Damaged => card.is_some_and(|c| c.damage > 0),
        Restriction::Undamaged => card.is_some_and(|c| c.damage == 0),
        Restriction::Exhausted => card.is_some_and(|c| c.exhausted),
        Restriction::Ready => card.is_some_and(|c| !c.exhausted),
        Restriction::Token => card.is_some_and(|c| c.token),
        Restriction::NonToken => card.is_some_and(|c| !c.token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, TokenKind, Tribe};
    use crate::engine::test_support::{board_with, grunt_id, knight_id};
    use proptest::prelude::*;

    const P0: PlayerId = PlayerId(0);

    #[test]
    fn test_scope() {
        let (game, uids) = board_with(&[grunt_id(), grunt_id()], &[]);
        let others = TargetFilter::any().with_scope(Scope::OthersOnly);
        let only_self = TargetFilter::any().with_scope(Scope::SelfOnly);

        let q = Qualifier::new(P0, Some(uids[0]), &others);
        assert!(!qualify(&game, uids[0], &q));
        assert!(qualify(&game, uids[1], &q));

        let q = Qualifier::new(P0, Some(uids[0]), &only_self);
        assert!(qualify(&game, uids[0], &q));
        assert!(!qualify(&game, uids[1], &q));
    }

    #[test]
    fn test_tribe_kind_and_direction() {
        let (game, uids) = board_with(&[grunt_id(), knight_id()], &[grunt_id()]);

        let goblins = TargetFilter::any().with_tribe(Tribe::Goblin);
        let q = Qualifier::new(P0, None, &goblins);
        assert!(qualify(&game, uids[0], &q));
        assert!(!qualify(&game, uids[1], &q));
        assert!(qualify(&game, uids[2], &q));

        let friendly_goblins = goblins.clone().with_restriction(Restriction::Friendly);
        let q = Qualifier::new(P0, None, &friendly_goblins);
        assert!(!qualify(&game, uids[2], &q));

        let spells = TargetFilter::any().with_kind(CardKind::Spell);
        let q = Qualifier::new(P0, None, &spells);
        assert!(!qualify(&game, uids[0], &q));
    }

    #[test]
    fn test_players_fail_card_fields() {
        let (game, _) = board_with(&[], &[]);
        let me = EntityId::player(P0);

        let goblins = TargetFilter::any().with_tribe(Tribe::Goblin);
        assert!(!qualify(&game, me, &Qualifier::new(P0, None, &goblins)));

        let players = TargetFilter::any().with_restriction(Restriction::Player);
        assert!(qualify(&game, me, &Qualifier::new(P0, None, &players)));

        let tokens = TargetFilter::any().with_token(TokenKind::Wolf);
        assert!(!qualify(&game, me, &Qualifier::new(P0, None, &tokens)));
    }

    #[test]
    fn test_conditions_checked_first() {
        let (game, uids) = board_with(&[grunt_id()], &[]);
        let filter = TargetFilter::any();
        let conditions = [Condition::ControllerLifeAtMost(0)];
        let q = Qualifier::new(P0, None, &filter).with_conditions(&conditions);

        assert!(!qualify(&game, uids[0], &q));
    }

    proptest! {
        #[test]
        fn prop_qualify_is_pure(max_attack in 0i32..5, others_only in any::<bool>(), source_index in 0usize..3) {
            let (game, uids) = board_with(&[grunt_id(), knight_id()], &[grunt_id()]);
            let scope = if others_only { Scope::OthersOnly } else { Scope::All };
            let filter = TargetFilter::any()
                .with_scope(scope)
                .with_restriction(Restriction::MaxAttack(max_attack));
            let q = Qualifier::new(P0, Some(uids[source_index]), &filter);
            let before = game.summary();

            let first: Vec<bool> = uids.iter().map(|&u| qualify(&game, u, &q)).collect();
            let second: Vec<bool> = uids.iter().map(|&u| qualify(&game, u, &q)).collect();

            prop_assert_eq!(first, second);
            prop_assert_eq!(game.summary(), before);
        }
    }
}
