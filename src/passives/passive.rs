//! Passive definitions and grants.
//!
//! A `PassiveDefinition` sits on a card definition and describes a
//! continuous modifier and who it applies to. While the card is on the
//! board, every qualifying target holds a `GrantedPassive`: a clone tagged
//! with the granting card and the slot it came from, so grants can be
//! revoked in bulk when the source leaves.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::effects::{Condition, TargetFilter};

/// The modifier itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveKind {
    StatBoost { attack: i32, defense: i32 },
    /// Opposing effects cannot target the holder.
    Untargetable,
    /// May attack and exhaust the turn it enters.
    Haste,
    CannotAttack,
    /// Opposing attackers must aim at a Guardian while one exists.
    Guardian,
    /// Added to the effective cost of the holder (a hand card).
    CostModifier(i32),
    /// Subtracted from each instance of damage dealt to the holder.
    DamageReduction(i32),
}

impl PassiveKind {
    /// Same variant, ignoring carried values.
    #[must_use]
    pub fn same_kind(&self, other: &PassiveKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Who a passive applies to, relative to its source's controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveTarget {
    SelfCard,
    FriendlyCreatures,
    EnemyCreatures,
    AllCreatures,
    FriendlyHand,
    Controller,
    Opponent,
}

/// A continuous modifier on a card definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveDefinition {
    pub kind: PassiveKind,
    pub affects: PassiveTarget,
    #[serde(default)]
    pub filter: TargetFilter,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Bound when cloned into a grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EntityId>,
}

impl PassiveDefinition {
    #[must_use]
    pub fn new(kind: PassiveKind, affects: PassiveTarget) -> Self {
        Self {
            kind,
            affects,
            filter: TargetFilter::default(),
            conditions: Vec::new(),
            source: None,
        }
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
}

/// Where a grant came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantOrigin {
    /// Innate passive `index` of the granting card, kept while it qualifies.
    Aura { index: usize },
    /// Applied by a resolved effect.
    Effect { until_end_of_turn: bool },
}

/// A passive held by a card or player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPassive {
    pub passive: PassiveDefinition,
    pub granted_by: EntityId,
    pub origin: GrantOrigin,
}

impl GrantedPassive {
    /// A grant from innate passive `index` of `source`.
    #[must_use]
    pub fn aura(mut passive: PassiveDefinition, source: EntityId, index: usize) -> Self {
        passive.source = Some(source);
        Self {
            passive,
            granted_by: source,
            origin: GrantOrigin::Aura { index },
        }
    }

    /// A grant applied by an effect from `source`.
    #[must_use]
    pub fn from_effect(kind: PassiveKind, source: EntityId, until_end_of_turn: bool) -> Self {
        let mut passive = PassiveDefinition::new(kind, PassiveTarget::SelfCard);
        passive.source = Some(source);
        Self {
            passive,
            granted_by: source,
            origin: GrantOrigin::Effect { until_end_of_turn },
        }
    }

    #[must_use]
    pub fn is_aura(&self) -> bool {
        matches!(self.origin, GrantOrigin::Aura { .. })
    }

    #[must_use]
    pub fn is_aura_from(&self, source: EntityId, index: usize) -> bool {
        self.granted_by == source && self.origin == GrantOrigin::Aura { index }
    }

    #[must_use]
    pub fn expires_at_end_of_turn(&self) -> bool {
        matches!(
            self.origin,
            GrantOrigin::Effect {
                until_end_of_turn: true
            }
        )
    }
}
