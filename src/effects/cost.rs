//! Costs for additional, alternate and ability payments.
//!
//! Automatic costs are paid without asking the player anything. Selection
//! costs need a `select_cost` round naming exactly `count` candidates.

use serde::{Deserialize, Serialize};

use super::effect::TargetFilter;
use super::qualifier::{qualify, Qualifier};
use crate::core::{EntityId, PlayerId};
use crate::engine::Match;
use crate::passives::PassiveKind;
use crate::zones::Zone;

/// One payable cost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    Life(i32),
    Sacrifice { filter: TargetFilter, count: usize },
    Discard { filter: TargetFilter, count: usize },
    ExileFromGraveyard { filter: TargetFilter, count: usize },
    ExhaustSelf,
    RemoveCounters(i32),
}

impl Cost {
    /// Paid without a selection round.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        matches!(self, Cost::Life(_) | Cost::ExhaustSelf | Cost::RemoveCounters(_))
    }

    /// How many cards a selection cost takes. Zero for automatic costs.
    #[must_use]
    pub fn selection_count(&self) -> usize {
        match self {
            Cost::Sacrifice { count, .. }
            | Cost::Discard { count, .. }
            | Cost::ExileFromGraveyard { count, .. } => *count,
            _ => 0,
        }
    }

    /// Cards that could be chosen to pay a selection cost.
    pub fn candidates(&self, game: &Match, player: PlayerId, source: EntityId) -> Vec<EntityId> {
        let (zone_cards, filter): (Vec<EntityId>, &TargetFilter) = match self {
            Cost::Sacrifice { filter, .. } => (game.zones.board(player).collect(), filter),
            Cost::Discard { filter, .. } => (game.zones.cards(player, Zone::Hand).to_vec(), filter),
            Cost::ExileFromGraveyard { filter, .. } => {
                (game.zones.cards(player, Zone::Graveyard).to_vec(), filter)
            }
            _ => return Vec::new(),
        };

        let q = Qualifier::new(player, Some(source), filter);
        zone_cards
            .into_iter()
            .filter(|&uid| uid != source || matches!(self, Cost::Sacrifice { .. }))
            .filter(|&uid| qualify(game, uid, &q))
            .collect()
    }

    /// Can `player` pay this cost for `source`, on top of `life_committed`
    /// life already earmarked for other costs?
    pub fn can_pay(&self, game: &Match, player: PlayerId, source: EntityId, life_committed: i32) -> bool {
        match self {
            Cost::Life(n) => game.players[player].life > life_committed + n,
            Cost::ExhaustSelf => game.card(source).is_some_and(|card| {
                game.zones.on_board(source)
                    && !card.exhausted
                    && (!card.summoning_sick || game.has_passive(source, &PassiveKind::Haste))
            }),
            Cost::RemoveCounters(n) => game.card(source).is_some_and(|c| c.plus_counters >= *n),
            _ => self.candidates(game, player, source).len() >= self.selection_count(),
        }
    }

    /// Life this cost consumes.
    #[must_use]
    pub fn life(&self) -> i32 {
        match self {
            Cost::Life(n) => *n,
            _ => 0,
        }
    }
}

/// Can every cost in the list be paid together?
///
/// Selection costs reserve their cards as they go, so one card never pays
/// for two costs.
pub fn can_pay_all(costs: &[Cost], game: &Match, player: PlayerId, source: EntityId, base_life: i32) -> bool {
    reserve_payment(costs, game, player, source, base_life, &[]).is_some()
}

/// Cards a payment of `costs` would use, on top of `held` cards already
/// promised elsewhere. `None` when the costs cannot all be paid.
pub fn reserve_payment(
    costs: &[Cost],
    game: &Match,
    player: PlayerId,
    source: EntityId,
    base_life: i32,
    held: &[EntityId],
) -> Option<Vec<EntityId>> {
    let mut committed = base_life;
    let mut reserved = held.to_vec();
    for cost in costs {
        if cost.is_automatic() {
            if !cost.can_pay(game, player, source, committed) {
                return None;
            }
            committed += cost.life();
            continue;
        }
        let needed = cost.selection_count();
        let free: Vec<EntityId> = cost
            .candidates(game, player, source)
            .into_iter()
            .filter(|uid| !reserved.contains(uid))
            .take(needed)
            .collect();
        if free.len() < needed {
            return None;
        }
        reserved.extend(free);
    }
    Some(reserved.split_off(held.len()))
}
