//! Triggered abilities.
//!
//! ## Key Components
//!
//! - [`TriggerEvent`]: the closed set of events triggers listen for
//! - [`TriggerContext`]: one event waiting for detection
//! - [`TriggerDefinition`]: "when X, do Y" on a card definition
//! - [`TriggerDetector`]: finds the triggers a context fires
//! - [`PendingTrigger`]: a fired trigger waiting to go on the stack
//!
//! ## Example
//!
//! ```
//! use duel_engine::effects::{Effect, EffectKind, TargetType};
//! use duel_engine::triggers::{TriggerDefinition, TriggerEvent, TriggerSubject};
//!
//! // "Whenever a friendly creature dies, draw a card."
//! let trigger = TriggerDefinition::new(TriggerEvent::Death)
//!     .with_subject(TriggerSubject::Friendly)
//!     .with_effect(Effect::new(EffectKind::Draw, TargetType::Controller));
//!
//! assert_eq!(trigger.effects.len(), 1);
//! ```

pub mod definition;
pub mod detection;
pub mod event;

pub use definition::{DelayedTrigger, PendingTrigger, TriggerDefinition, TriggerSubject};
pub use detection::{Detection, TriggerDetector};
pub use event::{TriggerContext, TriggerEvent};
