//! # duel-engine
//!
//! Server-authoritative rules engine for a two-player collectible card game.
//!
//! ## Design Principles
//!
//! 1. **The server decides**: clients submit intents, the engine validates
//!    them against the full match state and either applies them or rejects
//!    them without changing anything.
//!
//! 2. **Suspendable pipelines**: casting, activation, trigger placement and
//!    resolution all halt on a typed request and resume exactly where they
//!    stopped when the answer arrives. At most one request is open per match.
//!
//! 3. **Data-driven cards**: card behaviour is a serde-derivable tree of
//!    effects, triggers, passives, costs and conditions. Nothing about a
//!    particular card is hardcoded in the engine.
//!
//! ## Architecture
//!
//! - **Arena ids**: card instances live in one arena and are named by
//!   `EntityId`. Players share the id space so target lists can mix both.
//!
//! - **Zone lists own control**: a card's controller is whichever player's
//!   zone list holds it.
//!
//! - **Deterministic**: all randomness comes from the per-match seed, and the
//!   intent history is enough to replay a match.
//!
//! ## Modules
//!
//! - `core`: entity ids, players, phases, intents, RNG, configuration
//! - `zones`: per-player ordered card lists
//! - `cards`: card definitions, the registry, runtime instances
//! - `effects`: effects, amounts, conditions, costs, targeting, resolution
//! - `triggers`: trigger definitions and detection
//! - `passives`: continuous modifiers and computed stats
//! - `stack`: the resolution stack and priority tracking
//! - `negotiation`: the cast / activate / trigger pipeline records
//! - `events`: per-player client event streams
//! - `engine`: the `Match` itself and the registry of running matches

pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod events;
pub mod negotiation;
pub mod passives;
pub mod stack;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    AttackPair, DeckDestination, EntityId, Intent, IntentRecord, MatchConfig, MatchId, MatchRng, Phase,
    PlayerId, PlayerMap, PlayerState,
};

pub use crate::zones::{Zone, ZoneManager, ZonePosition};

pub use crate::cards::{
    ActivatedAbility, AlternateCost, BindSource, CardDefinition, CardId, CardInstance, CardKind, CardRegistry,
    Rarity, TokenKind, Tribe,
};

pub use crate::effects::{
    Amount, Condition, Cost, Effect, EffectKind, EffectOutcome, EffectResolver, TargetFilter, TargetType,
};

pub use crate::triggers::{TriggerDefinition, TriggerEvent, TriggerSubject};

pub use crate::passives::{PassiveDefinition, PassiveKind, PassiveTarget};

pub use crate::stack::{StackObj, StackOrigin};

pub use crate::negotiation::{NegotiationRequest, PendingInteraction, ResolutionRequest};

pub use crate::events::{ClientEvent, EventKind};

pub use crate::engine::{Match, MatchOutcome, MatchRegistry, MatchSummary};

pub use crate::error::{EngineError, Rejection, Result};
