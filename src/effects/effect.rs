//! Effect definitions.
//!
//! An `Effect` is one typed rule fragment: a closed `EffectKind` carrying
//! only the data that kind needs, plus the shared targeting, amount and
//! condition metadata. Definitions hold pristine effects; the stack holds
//! clones whose runtime fields (source, targets, affected, chosen amount)
//! are filled in as the effect is negotiated and resolved.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::condition::Condition;
use crate::cards::{ActivatedAbility, CardKind, TokenKind, Tribe};
use crate::core::EntityId;
use crate::passives::PassiveKind;
use crate::triggers::TriggerDefinition;

/// Which counter an `AddCounters` effect places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    PlusOne,
    MinusOne,
}

/// What an effect does when it resolves.
///
/// Unless noted, the effect's `amount` is the magnitude and it applies to
/// each affected entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Damage a creature or a player.
    Damage,
    /// Restore life, or remove damage from a creature.
    Heal,
    /// Life loss that ignores damage reduction.
    LoseLife,
    Draw,
    /// Discard `amount` random cards.
    Discard,
    /// Move `amount` cards from the top of the deck to the graveyard.
    Mill,
    Destroy,
    Exile,
    ReturnToHand,
    /// Return a graveyard card to play under the effect's controller.
    Resurrect,
    AddCounters(CounterKind),
    /// Stat change that wears off at end of turn.
    ModifyStats { attack: i32, defense: i32 },
    GrantPassive { passive: PassiveKind, until_end_of_turn: bool },
    GrantAbility(Box<ActivatedAbility>),
    /// Create `amount` tokens on each affected player's board.
    SummonToken(TokenKind),
    TakeControl,
    /// Remove a card from the stack and put it in its owner's graveyard.
    Counter,
    /// Search the deck for `amount` cards matching the filter.
    Tutor,
    /// Look at the top `amount` cards and choose where each goes.
    DeckPeek,
    /// Show the affected hand cards to the opponent.
    Reveal,
    ExtraTurn,
    ShuffleDeck,
    /// Each affected player sacrifices `amount` of their weakest creatures.
    Sacrifice,
    /// Arm a one-shot trigger that fires on its next matching event.
    DelayedTrigger(Box<TriggerDefinition>),
}

impl EffectKind {
    /// Kinds that pause resolution for a player's selection.
    #[must_use]
    pub fn needs_selection(&self) -> bool {
        matches!(self, EffectKind::Tutor | EffectKind::DeckPeek)
    }
}

/// What an effect may be aimed at.
///
/// Selection types are chosen by the player while casting. The rest are
/// computed when the effect resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    None,
    Controller,
    Opponent,
    EachPlayer,
    AnyPlayer,
    SelfCard,
    Creature,
    FriendlyCreature,
    EnemyCreature,
    AnyTarget,
    AllCreatures,
    AllFriendly,
    AllEnemy,
    HandCard,
    GraveyardCard,
    StackItem,
    /// Entities the parent effect affected.
    ParentAffected,
    /// The card whose event fired the trigger.
    Subject,
}

impl TargetType {
    /// Does the player pick targets for this type?
    #[must_use]
    pub const fn needs_selection(self) -> bool {
        matches!(
            self,
            TargetType::AnyPlayer
                | TargetType::Creature
                | TargetType::FriendlyCreature
                | TargetType::EnemyCreature
                | TargetType::AnyTarget
                | TargetType::HandCard
                | TargetType::GraveyardCard
                | TargetType::StackItem
        )
    }

    /// Whether the universe for this type includes board creatures.
    #[must_use]
    pub const fn includes_board(self) -> bool {
        matches!(
            self,
            TargetType::Creature
                | TargetType::FriendlyCreature
                | TargetType::EnemyCreature
                | TargetType::AnyTarget
                | TargetType::AllCreatures
                | TargetType::AllFriendly
                | TargetType::AllEnemy
        )
    }
}

/// Whether the construct's own source counts among candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    All,
    SelfOnly,
    OthersOnly,
}

/// Extra predicates a candidate must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    MaxCost(i32),
    MinCost(i32),
    MaxAttack(i32),
    MinAttack(i32),
    Damaged,
    Undamaged,
    Exhausted,
    Ready,
    Token,
    NonToken,
    Friendly,
    Enemy,
    /// Candidate must be a card (not a player).
    Card,
    /// Candidate must be a player.
    Player,
}

/// Filter fields shared by effects, triggers, passives and costs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilter {
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub tribe: Option<Tribe>,
    #[serde(default)]
    pub card_kind: Option<CardKind>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    #[serde(default)]
    pub token: Option<TokenKind>,
}

impl TargetFilter {
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_tribe(mut self, tribe: Tribe) -> Self {
        self.tribe = Some(tribe);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.card_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: TokenKind) -> Self {
        self.token = Some(token);
        self
    }
}

fn default_target_count() -> usize {
    1
}

/// One rule fragment.
///
/// ## Example
///
/// ```
/// use duel_engine::effects::{Amount, Effect, EffectKind, TargetType};
///
/// // "Deal 2 damage to a creature. If you do, draw a card."
/// let effect = Effect::new(EffectKind::Damage, TargetType::Creature)
///     .with_fixed(2)
///     .with_additional(Effect::new(EffectKind::Draw, TargetType::Controller));
///
/// assert!(effect.target.needs_selection());
/// assert_eq!(effect.amount, Amount::Fixed(2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    #[serde(default)]
    pub target: TargetType,
    #[serde(default)]
    pub filter: TargetFilter,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Ask the controller before applying.
    #[serde(default)]
    pub optional: bool,
    /// The controller picks a value between 0 and the resolved amount.
    #[serde(default)]
    pub choose_amount: bool,
    /// Number of targets picked for selection types.
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Effects run right after this one.
    #[serde(default)]
    pub additional: Vec<Effect>,
    /// Run `additional` once per entity this effect affected.
    #[serde(default)]
    pub per_affected: bool,

    // Runtime fields, only set on stack clones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_amount: Option<i32>,
}

impl Effect {
    /// New effect with amount 1 and an empty filter.
    #[must_use]
    pub fn new(kind: EffectKind, target: TargetType) -> Self {
        Self {
            kind,
            target,
            filter: TargetFilter::default(),
            amount: Amount::default(),
            conditions: Vec::new(),
            optional: false,
            choose_amount: false,
            target_count: 1,
            additional: Vec::new(),
            per_affected: false,
            source: None,
            targets: Vec::new(),
            affected: Vec::new(),
            chosen_amount: None,
        }
    }

    #[must_use]
    pub fn with_fixed(mut self, amount: i32) -> Self {
        self.amount = Amount::Fixed(amount);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
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
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn with_chosen_amount(mut self) -> Self {
        self.choose_amount = true;
        self
    }

    #[must_use]
    pub fn with_target_count(mut self, count: usize) -> Self {
        self.target_count = count.max(1);
        self
    }

    #[must_use]
    pub fn with_additional(mut self, effect: Effect) -> Self {
        self.additional.push(effect);
        self
    }

    #[must_use]
    pub fn per_affected(mut self) -> Self {
        self.per_affected = true;
        self
    }

    /// Does casting this effect require a target selection round?
    #[must_use]
    pub fn needs_targets(&self) -> bool {
        self.target.needs_selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let effect = Effect::new(EffectKind::Draw, TargetType::Controller);
        assert_eq!(effect.amount, Amount::Fixed(1));
        assert_eq!(effect.target_count, 1);
        assert!(!effect.optional);
        assert!(!effect.needs_targets());
    }

    #[test]
    fn test_selection_types() {
        assert!(TargetType::Creature.needs_selection());
        assert!(TargetType::StackItem.needs_selection());
        assert!(!TargetType::AllEnemy.needs_selection());
        assert!(!TargetType::ParentAffected.needs_selection());
        assert!(TargetType::AllEnemy.includes_board());
        assert!(!TargetType::HandCard.includes_board());
    }

    #[test]
    fn test_target_count_floor() {
        let effect = Effect::new(EffectKind::Destroy, TargetType::Creature).with_target_count(0);
        assert_eq!(effect.target_count, 1);
    }

    #[test]
    fn test_runtime_fields_skipped_when_empty() {
        let effect = Effect::new(EffectKind::Damage, TargetType::AnyTarget).with_fixed(3);
        let json = serde_json::to_string(&effect).unwrap();
        assert!(!json.contains("targets"));
        assert!(!json.contains("source"));

        let back: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, back);
    }

    #[test]
    fn test_filter_builder() {
        let filter = TargetFilter::any()
            .with_scope(Scope::OthersOnly)
            .with_tribe(Tribe::Goblin)
            .with_restriction(Restriction::Friendly);

        assert_eq!(filter.scope, Scope::OthersOnly);
        assert_eq!(filter.tribe, Some(Tribe::Goblin));
        assert_eq!(filter.restrictions, vec![Restriction::Friendly]);
    }
}
