//! Passive application engine.
//!
//! `PassiveEngine::refresh` brings every aura grant in line with the board.
//! It runs after every board mutation, in three passes:
//!
//! 1. Revoke every aura grant whose source is no longer on the board.
//! 2. Revoke aura grants whose target no longer qualifies.
//! 3. Test every innate passive on the board against its in-scope
//!    universe and give each qualifying target a tagged clone, skipping
//!    targets that already hold one from the same source and slot.
//!
//! Running it twice in a row changes nothing the second time.

use tracing::debug;

use super::passive::{GrantedPassive, PassiveDefinition, PassiveTarget};
use crate::cards::BindSource;
use crate::core::{EntityId, PlayerId};
use crate::effects::{qualify, Qualifier};
use crate::engine::Match;
use crate::zones::Zone;

/// What a refresh changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub granted: usize,
    pub revoked: usize,
}

impl RefreshReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.granted > 0 || self.revoked > 0
    }
}

/// Applies and revokes aura grants.
pub struct PassiveEngine;

impl PassiveEngine {
    /// Re-evaluate every aura against the current board.
    pub fn refresh(game: &mut Match) -> RefreshReport {
        let mut report = RefreshReport::default();
        report.revoked += Self::revoke_orphaned(game);
        report.revoked += Self::revoke_unqualified(game);
        report.granted += Self::apply_all(game);

        if report.changed() {
            debug!(granted = report.granted, revoked = report.revoked, "passives refreshed");
        }
        report
    }

    /// Entities `passive` on `source` (controlled by `controller`) can reach.
    pub fn universe(
        game: &Match,
        source: EntityId,
        controller: PlayerId,
        affects: PassiveTarget,
    ) -> Vec<EntityId> {
        match affects {
            PassiveTarget::SelfCard => vec![source],
            PassiveTarget::FriendlyCreatures => game.zones.board(controller).collect(),
            PassiveTarget::EnemyCreatures => game.zones.board(controller.opponent()).collect(),
            PassiveTarget::AllCreatures => game.zones.both_boards(controller).collect(),
            PassiveTarget::FriendlyHand => game.zones.cards(controller, Zone::Hand).to_vec(),
            PassiveTarget::Controller => vec![EntityId::player(controller)],
            PassiveTarget::Opponent => vec![EntityId::player(controller.opponent())],
        }
    }

    fn revoke_orphaned(game: &mut Match) -> usize {
        let on_board: Vec<EntityId> = game.zones.both_boards(game.active).collect();
        let still_there = |g: &GrantedPassive| !g.is_aura() || on_board.contains(&g.granted_by);

        let mut revoked = 0;
        for card in game.cards.iter_mut() {
            let before = card.granted.len();
            card.granted.retain(|g| still_there(g));
            revoked += before - card.granted.len();
        }
        for (_, player) in game.players.iter_mut() {
            let before = player.granted.len();
            player.granted.retain(|g| still_there(g));
            revoked += before - player.granted.len();
        }
        revoked
    }

    /// Does `target` still qualify for aura slot `index` of `source`?
    fn still_qualifies(game: &Match, target: EntityId, source: EntityId, index: usize) -> bool {
        let Some(controller) = game.zones.controller(source) else {
            return false;
        };
        let Some(passive) = game.innate_passive(source, index) else {
            return false;
        };
        Self::universe(game, source, controller, passive.affects).contains(&target)
            && qualify(game, target, &Self::qualifier(passive, source, controller))
    }

    fn qualifier(passive: &PassiveDefinition, source: EntityId, controller: PlayerId) -> Qualifier<'_> {
        Qualifier::new(controller, Some(source), &passive.filter).with_conditions(&passive.conditions)
    }

    fn revoke_unqualified(game: &mut Match) -> usize {
        let mut doomed: Vec<(EntityId, EntityId, usize)> = Vec::new();

        let holders = game
            .cards
            .iter()
            .map(|c| (c.uid, &c.granted))
            .chain(game.players.iter().map(|(p, s)| (EntityId::player(p), &s.granted)));
        for (target, grants) in holders {
            for grant in grants {
                if let crate::passives::GrantOrigin::Aura { index } = grant.origin {
                    if !Self::still_qualifies(game, target, grant.granted_by, index) {
                        doomed.push((target, grant.granted_by, index));
                    }
                }
            }
        }

        for &(target, source, index) in &doomed {
            if let Some(grants) = game.grants_mut(target) {
                grants.retain(|g| !g.is_aura_from(source, index));
            }
        }
        doomed.len()
    }

    fn apply_all(game: &mut Match) -> usize {
        let mut additions: Vec<(EntityId, GrantedPassive)> = Vec::new();

        let sources: Vec<EntityId> = game.zones.both_boards(game.active).collect();
        for source in sources {
            let Some(controller) = game.zones.controller(source) else {
                continue;
            };
            let Ok(definition) = game.definition(source) else {
                continue;
            };
            for (index, passive) in definition.passives.iter().enumerate() {
                let q = Self::qualifier(passive, source, controller).with_dedupe(source, index);
                for target in Self::universe(game, source, controller, passive.affects) {
                    let pending = additions
                        .iter()
                        .any(|(t, g)| *t == target && g.is_aura_from(source, index));
                    if !pending && qualify(game, target, &q) {
                        additions.push((
                            target,
                            GrantedPassive::aura(passive.bound_to(source), source, index),
                        ));
                    }
                }
            }
        }

        let granted = additions.len();
        for (target, grant) in additions {
            if let Some(grants) = game.grants_mut(target) {
                grants.push(grant);
            }
        }
        granted
    }
}
