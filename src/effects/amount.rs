//! Effect amounts.
//!
//! Amounts are resolved when the effect resolves, never when it is queued.
//! A basis that cannot be evaluated is an `AmountError`, and the effect
//! using it fizzles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Tribe;
use crate::core::{EntityId, PlayerId};
use crate::engine::Match;
use crate::zones::Zone;

/// Board-state quantity an amount can be based on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountBasis {
    /// Creatures of a tribe on the controller's board.
    TribeCount(Tribe),
    FriendlyCreatures,
    EnemyCreatures,
    AllCreatures,
    TargetCost,
    TargetAttack,
    TargetDefense,
    ControllerLife,
    OpponentLife,
    HandSize,
    GraveyardSize,
    /// Entities the parent effect affected.
    ParentAffected,
}

fn one() -> i32 {
    1
}

/// How big an effect is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    Fixed(i32),
    /// The X paid when the card or ability was put on the stack.
    X,
    BasedOn {
        basis: AmountBasis,
        #[serde(default = "one")]
        multiplier: i32,
        #[serde(default)]
        bonus: i32,
    },
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Fixed(1)
    }
}

/// Why an amount could not be computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount needs a target and none was chosen")]
    NoTarget,

    #[error("target {0} is gone")]
    TargetGone(EntityId),

    #[error("target {0} is not a card")]
    NotACard(EntityId),

    #[error("amount needs a parent effect")]
    NoParent,
}

/// Inputs for resolving an amount.
pub struct AmountContext<'a> {
    pub game: &'a Match,
    pub controller: PlayerId,
    pub target: Option<EntityId>,
    pub x: i32,
    pub parent_affected: Option<usize>,
}

impl Amount {
    /// Shorthand for `BasedOn` with multiplier 1 and no bonus.
    #[must_use]
    pub fn based_on(basis: AmountBasis) -> Self {
        Amount::BasedOn {
            basis,
            multiplier: 1,
            bonus: 0,
        }
    }

    /// Resolve against the current board.
    pub fn resolve(&self, ctx: &AmountContext<'_>) -> Result<i32, AmountError> {
        match self {
            Amount::Fixed(n) => Ok(*n),
            Amount::X => Ok(ctx.x),
            Amount::BasedOn {
                basis,
                multiplier,
                bonus,
            } => Ok(basis_value(*basis, ctx)? * multiplier + bonus),
        }
    }
}

fn target_card(ctx: &AmountContext<'_>) -> Result<EntityId, AmountError> {
    let target = ctx.target.ok_or(AmountError::NoTarget)?;
    if target.is_player() {
        return Err(AmountError::NotACard(target));
    }
    Ok(target)
}

fn board_target(ctx: &AmountContext<'_>) -> Result<EntityId, AmountError> {
    let target = target_card(ctx)?;
    if !ctx.game.zones.on_board(target) {
        return Err(AmountError::TargetGone(target));
    }
    Ok(target)
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn basis_value(basis: AmountBasis, ctx: &AmountContext<'_>) -> Result<i32, AmountError> {
    let game = ctx.game;
    let me = ctx.controller;
    let value = match basis {
        AmountBasis::TribeCount(tribe) => count(
            game.zones
                .board(me)
                .filter(|&uid| game.tribe_of(uid) == Some(tribe))
                .count(),
        ),
        AmountBasis::FriendlyCreatures => count(game.zones.board(me).count()),
        AmountBasis::EnemyCreatures => count(game.zones.board(me.opponent()).count()),
        AmountBasis::AllCreatures => count(game.zones.both_boards(me).count()),
        AmountBasis::TargetCost => {
            let target = target_card(ctx)?;
            game.base_cost(target).ok_or(AmountError::TargetGone(target))?
        }
        AmountBasis::TargetAttack => game.attack(board_target(ctx)?),
        AmountBasis::TargetDefense => game.defense(board_target(ctx)?),
        AmountBasis::ControllerLife => game.players[me].life,
        AmountBasis::OpponentLife => game.players[me.opponent()].life,
        AmountBasis::HandSize => count(game.zones.size(me, Zone::Hand)),
        AmountBasis::GraveyardSize => count(game.zones.size(me, Zone::Graveyard)),
        AmountBasis::ParentAffected => count(ctx.parent_affected.ok_or(AmountError::NoParent)?),
    };
    Ok(value)
}
