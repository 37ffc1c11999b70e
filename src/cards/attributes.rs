//! Closed card attribute vocabularies and the token table.
//!
//! ## Token table
//!
//! Tokens are created at runtime from a fixed table keyed by `TokenKind`.
//! The table is built once per process and never mutated; token definitions
//! live in a reserved `CardId` range so the registry can hand them out like
//! any other definition.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};

/// Creature tribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tribe {
    Human,
    Goblin,
    Elf,
    Undead,
    Beast,
    Dragon,
    Spirit,
    Construct,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Whether a card becomes a creature on resolution or goes to the graveyard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Summon,
    Spell,
}

/// Token subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Goblin,
    Skeleton,
    Wolf,
    Spirit,
    Golem,
}

impl TokenKind {
    pub const ALL: [TokenKind; 5] = [
        TokenKind::Goblin,
        TokenKind::Skeleton,
        TokenKind::Wolf,
        TokenKind::Spirit,
        TokenKind::Golem,
    ];

    /// Definition id reserved for this token kind.
    #[must_use]
    pub const fn card_id(self) -> CardId {
        CardId(TOKEN_ID_BASE + self as u32)
    }

    /// The immutable definition for this token kind.
    #[must_use]
    pub fn definition(self) -> &'static CardDefinition {
        &TOKEN_TABLE[&self]
    }
}

/// First `CardId` reserved for token definitions.
pub const TOKEN_ID_BASE: u32 = 0xFFFF_0000;

/// (kind, name, attack, defense, tribe)
const TOKEN_STATS: [(TokenKind, &str, i32, i32, Tribe); 5] = [
    (TokenKind::Goblin, "Goblin Token", 1, 1, Tribe::Goblin),
    (TokenKind::Skeleton, "Skeleton Token", 1, 1, Tribe::Undead),
    (TokenKind::Wolf, "Wolf Token", 2, 2, Tribe::Beast),
    (TokenKind::Spirit, "Spirit Token", 1, 1, Tribe::Spirit),
    (TokenKind::Golem, "Golem Token", 3, 3, Tribe::Construct),
];

static TOKEN_TABLE: Lazy<FxHashMap<TokenKind, CardDefinition>> = Lazy::new(|| {
    TOKEN_STATS
        .iter()
        .map(|&(kind, name, attack, defense, tribe)| {
            let def = CardDefinition::summon(kind.card_id(), name, 0, attack, defense)
                .with_tribe(tribe)
                .with_token(kind);
            (kind, def)
        })
        .collect()
});

/// Look up a token definition by its reserved id.
#[must_use]
pub fn token_definition(id: CardId) -> Option<&'static CardDefinition> {
    let offset = id.0.checked_sub(TOKEN_ID_BASE)?;
    TokenKind::ALL
        .get(offset as usize)
        .map(|kind| kind.definition())
}
