//! Continuous effects.
//!
//! - `PassiveDefinition`: a modifier declared on a card definition
//! - `GrantedPassive`: a tagged clone held by a card or player
//! - `PassiveEngine`: keeps aura grants in line with the board
//! - stat computation (`Match::attack`, `Match::defense`, `Match::effective_cost`)

pub mod engine;
pub mod passive;
mod stats;

pub use engine::{PassiveEngine, RefreshReport};
pub use passive::{GrantOrigin, GrantedPassive, PassiveDefinition, PassiveKind, PassiveTarget};
