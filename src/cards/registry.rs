//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every definition the loader produced. Token
//! definitions are served from the process-wide token table, so lookups for
//! reserved token ids always succeed without registering anything.

use rustc_hash::FxHashMap;

use super::attributes::{token_definition, TOKEN_ID_BASE};
use super::definition::{CardDefinition, CardId};
use crate::error::{EngineError, Result};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use duel_engine::cards::{CardDefinition, CardId, CardRegistry, TokenKind};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::spell(CardId::new(1), "Firebolt", 2)).unwrap();
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Firebolt");
/// assert!(registry.get(TokenKind::Wolf.card_id()).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from definitions.
    pub fn from_definitions(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Fails if the id is taken or falls in the reserved token range.
    pub fn register(&mut self, card: CardDefinition) -> Result<()> {
        if card.id.0 >= TOKEN_ID_BASE || self.cards.contains_key(&card.id) {
            return Err(EngineError::invariant(format!(
                "{} cannot be registered twice or inside the token range",
                card.id
            )));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id).or_else(|| token_definition(id))
    }

    /// Get a card definition or fail with `UnknownDefinition`.
    pub fn require(&self, id: CardId) -> Result<&CardDefinition> {
        self.get(id).ok_or(EngineError::UnknownDefinition(id.0))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    /// Number of registered (non-token) definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over registered definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
