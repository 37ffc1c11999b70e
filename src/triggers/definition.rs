//! Trigger definitions and detected triggers.

use serde::{Deserialize, Serialize};

use super::event::TriggerEvent;
use crate::core::{EntityId, PlayerId};
use crate::effects::{Condition, Effect, TargetFilter};

/// Whose event a trigger reacts to, relative to the trigger's controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerSubject {
    /// Only events about the trigger's own card.
    SelfCard,
    Friendly,
    Enemy,
    #[default]
    Any,
}

/// "When X happens, do Y."
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub event: TriggerEvent,
    #[serde(default)]
    pub subject: TriggerSubject,
    /// Applied to the event's subject card.
    #[serde(default)]
    pub filter: TargetFilter,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub effects: Vec<Effect>,
    /// Listens while the card is in its owner's hand instead of on the board.
    #[serde(default)]
    pub active_in_hand: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EntityId>,
}

impl TriggerDefinition {
    #[must_use]
    pub fn new(event: TriggerEvent) -> Self {
        Self {
            event,
            subject: TriggerSubject::default(),
            filter: TargetFilter::default(),
            conditions: Vec::new(),
            effects: Vec::new(),
            active_in_hand: false,
            source: None,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: TriggerSubject) -> Self {
        self.subject = subject;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn in_hand(mut self) -> Self {
        self.active_in_hand = true;
        self
    }
}

/// A one-shot trigger armed by an effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayedTrigger {
    pub controller: PlayerId,
    pub trigger: TriggerDefinition,
}

/// A trigger that fired and is waiting to be negotiated onto the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTrigger {
    pub source: EntityId,
    pub controller: PlayerId,
    /// Clones bound to `source`.
    pub effects: Vec<Effect>,
    pub event: TriggerEvent,
    pub subject: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, TargetType};

    #[test]
    fn test_builder() {
        let trigger = TriggerDefinition::new(TriggerEvent::Death)
            .with_subject(TriggerSubject::Friendly)
            .with_effect(Effect::new(EffectKind::Draw, TargetType::Controller))
            .in_hand();

        assert_eq!(trigger.subject, TriggerSubject::Friendly);
        assert_eq!(trigger.effects.len(), 1);
        assert!(trigger.active_in_hand);
        assert_eq!(trigger.source, None);
    }

    #[test]
    fn test_sparse_json() {
        let json = r#"{"event":"Summon","effects":[]}"#;
        let trigger: TriggerDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.subject, TriggerSubject::Any);
        assert!(!trigger.active_in_hand);
    }
}
