//! Computed card statistics.
//!
//! Nothing here is cached: attack, defense and cost are recomputed from the
//! definition, counters and current grants on every call.

use super::passive::{GrantedPassive, PassiveKind};
use crate::core::EntityId;
use crate::effects::{AmountContext, ConditionContext, ConditionEvaluator};
use crate::engine::Match;

impl Match {
    /// Passives currently held by a card or player.
    #[must_use]
    pub fn grants_of(&self, entity: EntityId) -> &[GrantedPassive] {
        match entity.as_player() {
            Some(player) => &self.players[player].granted,
            None => self.card(entity).map_or(&[], |c| c.granted.as_slice()),
        }
    }

    fn stat_boosts(&self, uid: EntityId) -> (i32, i32) {
        self.grants_of(uid)
            .iter()
            .fold((0, 0), |(atk, def), grant| match grant.passive.kind {
                PassiveKind::StatBoost { attack, defense } => (atk + attack, def + defense),
                _ => (atk, def),
            })
    }

    /// Current attack: base + counters + stat boosts.
    #[must_use]
    pub fn attack(&self, uid: EntityId) -> i32 {
        let Some(card) = self.card(uid) else {
            return 0;
        };
        let base = self.definition(uid).map_or(0, |d| d.attack);
        base + card.counter_bonus() + self.stat_boosts(uid).0
    }

    /// Current defense: base + counters + stat boosts.
    #[must_use]
    pub fn defense(&self, uid: EntityId) -> i32 {
        let Some(card) = self.card(uid) else {
            return 0;
        };
        let base = self.definition(uid).map_or(0, |d| d.defense);
        base + card.counter_bonus() + self.stat_boosts(uid).1
    }

    /// Defense minus damage taken this turn.
    #[must_use]
    pub fn remaining_defense(&self, uid: EntityId) -> i32 {
        self.defense(uid) - self.card(uid).map_or(0, |c| c.damage)
    }

    /// Life `uid` costs to cast right now, before X.
    ///
    /// Base cost, plus every cost modifier on the definition whose
    /// conditions hold, plus cost passives the card holds, floored at zero.
    #[must_use]
    pub fn effective_cost(&self, uid: EntityId) -> i32 {
        let Ok(definition) = self.definition(uid) else {
            return 0;
        };
        let controller = self
            .zones
            .controller(uid)
            .or_else(|| self.card(uid).map(|c| c.owner))
            .unwrap_or(self.active);

        let conditions = ConditionContext::new(self, controller).with_source(Some(uid));
        let amounts = AmountContext {
            game: self,
            controller,
            target: Some(uid),
            x: 0,
            parent_affected: None,
        };
        let modifiers: i32 = definition
            .cost_modifiers
            .iter()
            .filter(|m| ConditionEvaluator::all(&m.conditions, &conditions))
            .filter_map(|m| m.amount.resolve(&amounts).ok())
            .sum();
        let passives: i32 = self
            .grants_of(uid)
            .iter()
            .map(|g| match g.passive.kind {
                PassiveKind::CostModifier(n) => n,
                _ => 0,
            })
            .sum();

        (definition.cost + modifiers + passives).max(0)
    }

    /// Does the card or player hold a passive of this kind?
    ///
    /// Values carried by the kind are ignored.
    #[must_use]
    pub fn has_passive(&self, entity: EntityId, kind: &PassiveKind) -> bool {
        self.grants_of(entity)
            .iter()
            .any(|g| g.passive.kind.same_kind(kind))
    }

    /// Total damage reduction the entity holds.
    #[must_use]
    pub fn damage_reduction(&self, entity: EntityId) -> i32 {
        self.grants_of(entity)
            .iter()
            .map(|g| match g.passive.kind {
                PassiveKind::DamageReduction(n) => n,
                _ => 0,
            })
            .sum()
    }

    /// Does `candidate` already hold aura slot `index` of `source`?
    #[must_use]
    pub fn holds_grant(&self, candidate: EntityId, source: EntityId, index: usize) -> bool {
        self.grants_of(candidate)
            .iter()
            .any(|g| g.is_aura_from(source, index))
    }
}
