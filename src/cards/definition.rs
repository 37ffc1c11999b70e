//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: stats, tribe,
//! and the nested effect, trigger, passive and ability trees the loader
//! produced. Instance-specific data (damage taken, counters, overlays) is
//! stored separately in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::attributes::{CardKind, Rarity, TokenKind, Tribe};
use crate::effects::{Amount, Condition, Cost, Effect, TargetFilter};
use crate::passives::PassiveDefinition;
use crate::triggers::TriggerDefinition;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Goblin Chieftain"),
/// not a specific instance in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// An ability a card's controller may activate by paying its costs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub name: String,
    pub costs: Vec<Cost>,
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub once_per_turn: bool,
    #[serde(default)]
    pub x_cost: bool,
    /// Bound at instantiation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<crate::core::EntityId>,
}

impl ActivatedAbility {
    pub fn new(name: impl Into<String>, costs: Vec<Cost>, effects: Vec<Effect>) -> Self {
        Self {
            name: name.into(),
            costs,
            effects,
            conditions: Vec::new(),
            once_per_turn: false,
            x_cost: false,
            source: None,
        }
    }

    #[must_use]
    pub fn once_per_turn(mut self) -> Self {
        self.once_per_turn = true;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_x_cost(mut self) -> Self {
        self.x_cost = true;
        self
    }
}

/// One option of a modal card. The chosen mode's effects follow the card's
/// own effects on the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    pub label: String,
    pub effects: Vec<Effect>,
}

/// A replacement for the life payment, offered when its conditions hold.
///
/// Only automatic costs (no selection round) are allowed here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlternateCost {
    pub costs: Vec<Cost>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Creatures that must be sacrificed to summon the card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tribute {
    pub filter: TargetFilter,
    pub count: usize,
}

/// Conditional change to the card's own cost. Negative amounts reduce it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostModifier {
    pub amount: Amount,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, Tribe};
/// use duel_engine::effects::{Effect, EffectKind, TargetType};
///
/// let bolt = CardDefinition::spell(CardId::new(1), "Firebolt", 2)
///     .with_effect(Effect::new(EffectKind::Damage, TargetType::AnyTarget).with_fixed(3));
///
/// let grunt = CardDefinition::summon(CardId::new(2), "Goblin Grunt", 1, 2, 1)
///     .with_tribe(Tribe::Goblin);
///
/// assert_eq!(bolt.effects.len(), 1);
/// assert!(grunt.is_summon());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    pub cost: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub tribe: Option<Tribe>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub token: Option<TokenKind>,

    /// Effects put on the stack when the card is cast.
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub triggers: Vec<TriggerDefinition>,
    #[serde(default)]
    pub passives: Vec<PassiveDefinition>,
    #[serde(default)]
    pub abilities: Vec<ActivatedAbility>,

    #[serde(default)]
    pub cost_modifiers: Vec<CostModifier>,
    #[serde(default)]
    pub cast_conditions: Vec<Condition>,
    #[serde(default)]
    pub additional_costs: Vec<Cost>,
    #[serde(default)]
    pub alternate_cost: Option<AlternateCost>,
    #[serde(default)]
    pub tribute: Option<Tribute>,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub x_cost: bool,
    #[serde(default)]
    pub enters_attacking: bool,
}

impl CardDefinition {
    fn base(id: CardId, name: impl Into<String>, kind: CardKind, cost: i32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            cost,
            attack: 0,
            defense: 0,
            tribe: None,
            rarity: Rarity::Common,
            token: None,
            effects: Vec::new(),
            triggers: Vec::new(),
            passives: Vec::new(),
            abilities: Vec::new(),
            cost_modifiers: Vec::new(),
            cast_conditions: Vec::new(),
            additional_costs: Vec::new(),
            alternate_cost: None,
            tribute: None,
            modes: Vec::new(),
            x_cost: false,
            enters_attacking: false,
        }
    }

    /// A creature card.
    #[must_use]
    pub fn summon(id: CardId, name: impl Into<String>, cost: i32, attack: i32, defense: i32) -> Self {
        Self {
            attack,
            defense,
            ..Self::base(id, name, CardKind::Summon, cost)
        }
    }

    /// A one-shot card.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, cost: i32) -> Self {
        Self::base(id, name, CardKind::Spell, cost)
    }

    #[must_use]
    pub fn is_summon(&self) -> bool {
        self.kind == CardKind::Summon
    }

    #[must_use]
    pub fn with_tribe(mut self, tribe: Tribe) -> Self {
        self.tribe = Some(tribe);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: TokenKind) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }

    #[must_use]
    pub fn with_passive(mut self, passive: PassiveDefinition) -> Self {
        self.passives.push(passive);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: ActivatedAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_cost_modifier(mut self, modifier: CostModifier) -> Self {
        self.cost_modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_cast_condition(mut self, condition: Condition) -> Self {
        self.cast_conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_additional_cost(mut self, cost: Cost) -> Self {
        self.additional_costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_alternate_cost(mut self, alternate: AlternateCost) -> Self {
        self.alternate_cost = Some(alternate);
        self
    }

    #[must_use]
    pub fn with_tribute(mut self, filter: TargetFilter, count: usize) -> Self {
        self.tribute = Some(Tribute { filter, count });
        self
    }

    #[must_use]
    pub fn with_mode(mut self, label: impl Into<String>, effects: Vec<Effect>) -> Self {
        self.modes.push(Mode {
            label: label.into(),
            effects,
        });
        self
    }

    #[must_use]
    pub fn with_x_cost(mut self) -> Self {
        self.x_cost = true;
        self
    }

    #[must_use]
    pub fn entering_attacking(mut self) -> Self {
        self.enters_attacking = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, TargetType};

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_summon_builder() {
        let card = CardDefinition::summon(CardId::new(1), "Goblin Grunt", 2, 2, 1)
            .with_tribe(Tribe::Goblin)
            .with_rarity(Rarity::Uncommon)
            .entering_attacking();

        assert!(card.is_summon());
        assert_eq!(card.attack, 2);
        assert_eq!(card.defense, 1);
        assert_eq!(card.tribe, Some(Tribe::Goblin));
        assert!(card.enters_attacking);
    }

    #[test]
    fn test_definition_serialization() {
        let card = CardDefinition::spell(CardId::new(9), "Firebolt", 2)
            .with_effect(Effect::new(EffectKind::Damage, TargetType::AnyTarget).with_fixed(3))
            .with_mode("Draw", vec![Effect::new(EffectKind::Draw, TargetType::Controller)]);

        let json = serde_json::to_string(&card).unwrap();
        let back: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }

    #[test]
    fn test_sparse_json_uses_defaults() {
        let json = r#"{"id":3,"name":"Wisp","kind":"Summon","cost":1,"attack":1,"defense":1}"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(card.rarity, Rarity::Common);
        assert!(card.effects.is_empty());
        assert!(!card.x_cost);
    }
}
