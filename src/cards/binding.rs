//! Source binding for nested definition trees.
//!
//! Definitions are shared between every instance of a card, so they never
//! name a source. Whenever an effect, trigger, passive or ability is cloned
//! out of a definition for one instance, the clone is walked and every node
//! is stamped with that instance's id.

use crate::core::EntityId;
use crate::effects::{Effect, EffectKind};
use crate::passives::PassiveDefinition;
use crate::triggers::TriggerDefinition;

use super::definition::ActivatedAbility;

/// A definition node that can be bound to the card it belongs to.
pub trait BindSource {
    fn bind_source(&mut self, source: EntityId);

    /// Clone-and-bind in one step.
    #[must_use]
    fn bound_to(&self, source: EntityId) -> Self
    where
        Self: Clone + Sized,
    {
        let mut bound = self.clone();
        bound.bind_source(source);
        bound
    }
}

impl<T: BindSource> BindSource for Vec<T> {
    fn bind_source(&mut self, source: EntityId) {
        for item in self.iter_mut() {
            item.bind_source(source);
        }
    }
}

impl BindSource for Effect {
    fn bind_source(&mut self, source: EntityId) {
        self.source = Some(source);
        self.additional.bind_source(source);
        // Granted passives and abilities are bound to their recipient when granted.
        if let EffectKind::DelayedTrigger(trigger) = &mut self.kind {
            trigger.bind_source(source);
        }
    }
}

impl BindSource for TriggerDefinition {
    fn bind_source(&mut self, source: EntityId) {
        self.source = Some(source);
        self.effects.bind_source(source);
    }
}

impl BindSource for PassiveDefinition {
    fn bind_source(&mut self, source: EntityId) {
        self.source = Some(source);
    }
}

impl BindSource for ActivatedAbility {
    fn bind_source(&mut self, source: EntityId) {
        self.source = Some(source);
        self.effects.bind_source(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::TargetType;
    use crate::triggers::TriggerEvent;

    #[test]
    fn test_effect_tree_bound() {
        let effect = Effect::new(EffectKind::Damage, TargetType::Creature)
            .with_additional(Effect::new(EffectKind::Draw, TargetType::Controller));

        let bound = effect.bound_to(EntityId(42));

        assert_eq!(bound.source, Some(EntityId(42)));
        assert_eq!(bound.additional[0].source, Some(EntityId(42)));
        assert_eq!(effect.source, None);
    }

    #[test]
    fn test_trigger_and_delayed_trigger_bound() {
        let delayed = TriggerDefinition::new(TriggerEvent::Death)
            .with_effect(Effect::new(EffectKind::Draw, TargetType::Controller));
        let trigger = TriggerDefinition::new(TriggerEvent::Summon).with_effect(Effect::new(
            EffectKind::DelayedTrigger(Box::new(delayed)),
            TargetType::None,
        ));

        let bound = trigger.bound_to(EntityId(9));

        assert_eq!(bound.source, Some(EntityId(9)));
        match &bound.effects[0].kind {
            EffectKind::DelayedTrigger(inner) => {
                assert_eq!(inner.source, Some(EntityId(9)));
                assert_eq!(inner.effects[0].source, Some(EntityId(9)));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_ability_bound() {
        let ability = ActivatedAbility::new(
            "Ping",
            Vec::new(),
            vec![Effect::new(EffectKind::Damage, TargetType::AnyTarget)],
        );
        let bound = ability.bound_to(EntityId(3));
        assert_eq!(bound.source, Some(EntityId(3)));
        assert_eq!(bound.effects[0].source, Some(EntityId(3)));
    }
}
