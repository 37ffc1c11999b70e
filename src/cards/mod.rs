//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data and its nested ability trees
//! - `CardInstance`: Runtime card state (owner, counters, overlays)
//! - `CardRegistry`: Definition lookup, including the token table
//! - `BindSource`: Stamps cloned definition nodes with their source card

pub mod attributes;
pub mod binding;
pub mod definition;
pub mod instance;
pub mod registry;

pub use attributes::{token_definition, CardKind, Rarity, TokenKind, Tribe, TOKEN_ID_BASE};
pub use binding::BindSource;
pub use definition::{
    ActivatedAbility, AlternateCost, CardDefinition, CardId, CostModifier, Mode, Tribute,
};
pub use instance::CardInstance;
pub use registry::CardRegistry;
