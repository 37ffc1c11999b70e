//! Effect system for card abilities.
//!
//! Effects are the building blocks of every card:
//! - `Effect`: one typed rule fragment with targeting and amount metadata
//! - `Amount`: how big an effect is, resolved at resolution time
//! - `Condition`: board predicates gating effects, triggers and passives
//! - `Cost`: life, sacrifice, discard and other payments
//! - `qualify`: the shared candidate filter
//! - `EffectResolver`: executes effects against a match
//!
//! ## Resolution rules
//!
//! Amounts, conditions and targets are all re-read when the effect
//! resolves, never when it is put on the stack. Anything that no longer
//! holds fizzles that one effect; the rest of the stack entry carries on.

mod amount;
mod condition;
mod cost;
mod effect;
mod qualifier;
mod resolver;
mod targeting;

pub use amount::{Amount, AmountBasis, AmountContext, AmountError};
pub use condition::{Condition, ConditionContext, ConditionEvaluator};
pub use cost::{can_pay_all, reserve_payment, Cost};
pub use effect::{CounterKind, Effect, EffectKind, Restriction, Scope, TargetFilter, TargetType};
pub use qualifier::{qualify, Qualifier};
pub use resolver::{EffectOutcome, EffectResolver, ResolveContext};
pub use targeting::{has_required_targets, is_eligible, is_legal_target, possible_targets, universe};
