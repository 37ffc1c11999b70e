//! Error types for the match engine.
//!
//! Three outcomes are kept apart:
//! - [`Rejection`]: an illegal player action. Nothing in the match changed.
//! - [`EngineError::Invariant`]: state the current stage requires is missing.
//!   This is a bug in the engine, surfaced as a value rather than a panic.
//! - Fizzles are not errors at all; see `effects::EffectOutcome`.

use thiserror::Error;

use crate::core::{EntityId, MatchId, PlayerId};

/// Why a player's request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("the match is already over")]
    MatchOver,

    #[error("{0} does not hold priority")]
    NotYourPriority(PlayerId),

    #[error("an interaction is pending and must be answered first")]
    InteractionPending,

    #[error("nothing is waiting for an answer")]
    NothingPending,

    #[error("the pending decision belongs to {0}")]
    NotYourDecision(PlayerId),

    #[error("response does not match the pending {expected} request")]
    WrongResponse { expected: &'static str },

    #[error("unknown card {0}")]
    UnknownCard(EntityId),

    #[error("{0} cannot be cast right now")]
    NotPlayable(EntityId),

    #[error("ability {ability} of {card} cannot be activated right now")]
    NotActivatable { card: EntityId, ability: usize },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("choice {0} is out of range")]
    InvalidChoice(usize),

    #[error("amount {0} is not allowed")]
    InvalidAmount(i32),

    #[error("attacks can only be declared by the active player during combat")]
    NotCombat,

    #[error("attacks were already committed this combat")]
    AlreadyAttacked,

    #[error("{0} cannot attack")]
    CannotAttack(EntityId),

    #[error("{0} is not a legal attack target")]
    InvalidAttackTarget(EntityId),

    #[error("no legal targets remain")]
    NoLegalTargets,

    #[error("trigger order must be a permutation of 0..{0}")]
    InvalidOrder(usize),
}

/// Errors produced by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("engine invariant violated: {0}")]
    Invariant(String),

    #[error("unknown card definition: {0}")]
    UnknownDefinition(u32),

    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("intent history error: {0}")]
    History(#[from] bincode::Error),
}

impl EngineError {
    /// Build an invariant error from anything displayable.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// The rejection, if this error is a refused player action.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
