//! Attack declaration and combat damage.
//!
//! The active player builds a declaration during Combat with
//! `assign_attack` / `unassign_attack` and commits it with `submit_attack`.
//! Committed pairs deal damage when Damage begins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Match;
use crate::core::{AttackPair, EntityId, Phase, PlayerId};
use crate::error::{Rejection, Result};
use crate::events::{ClientEvent, EventKind};
use crate::passives::PassiveKind;
use crate::triggers::{TriggerContext, TriggerEvent};

/// This combat's declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackState {
    /// Built up by `assign_attack`, not yet committed.
    pub assigned: Vec<AttackPair>,
    /// Attacks that will deal damage.
    pub committed: Vec<AttackPair>,
    pub declared: bool,
}

impl AttackState {
    pub fn is_attacking(&self, uid: EntityId) -> bool {
        self.assigned.iter().chain(&self.committed).any(|(a, _)| *a == uid)
    }
}

impl Match {
    /// Could this creature be declared as an attacker now?
    pub(crate) fn can_attack(&self, uid: EntityId) -> bool {
        let Some(card) = self.card(uid) else {
            return false;
        };
        let on_board = self.zones.on_board(uid) && self.zones.controller(uid) == Some(self.active);
        on_board
            && !card.exhausted
            && (!card.summoning_sick || self.has_passive(uid, &PassiveKind::Haste))
            && !self.has_passive(uid, &PassiveKind::CannotAttack)
            && !self.attacks.committed.iter().any(|(a, _)| *a == uid)
    }

    /// Legal targets for an attacker: the opponent and their creatures, or
    /// only their Guardians while any exist.
    pub(crate) fn attack_targets(&self, attacker: EntityId) -> Vec<EntityId> {
        let Some(controller) = self.zones.controller(attacker) else {
            return Vec::new();
        };
        let defender = controller.opponent();
        let guardians: Vec<EntityId> = self
            .zones
            .board(defender)
            .filter(|&uid| self.has_passive(uid, &PassiveKind::Guardian))
            .collect();
        if !guardians.is_empty() {
            return guardians;
        }
        std::iter::once(EntityId::player(defender))
            .chain(self.zones.board(defender))
            .collect()
    }

    fn check_declaring(&self, player: PlayerId) -> std::result::Result<(), Rejection> {
        self.require_priority(player)?;
        if self.phase != Phase::Combat || player != self.active || !self.stack.is_empty() {
            return Err(Rejection::NotCombat);
        }
        if self.attacks.declared {
            return Err(Rejection::AlreadyAttacked);
        }
        Ok(())
    }

    fn check_pair(&self, (attacker, target): AttackPair, taken: &[AttackPair]) -> std::result::Result<(), Rejection> {
        if !self.can_attack(attacker) || taken.iter().any(|(a, _)| *a == attacker) {
            return Err(Rejection::CannotAttack(attacker));
        }
        if !self.attack_targets(attacker).contains(&target) {
            return Err(Rejection::InvalidAttackTarget(target));
        }
        Ok(())
    }

    pub(crate) fn do_assign_attack(&mut self, player: PlayerId, pairs: &[AttackPair]) -> Result<()> {
        self.check_declaring(player)?;
        let mut taken = self.attacks.assigned.clone();
        for &pair in pairs {
            self.check_pair(pair, &taken)?;
            taken.push(pair);
        }

        for &(attacker, target) in pairs {
            let event = ClientEvent::new(EventKind::AttackAssigned).with_uids([attacker, target]);
            self.events.private(player, event);
        }
        self.attacks.assigned = taken;
        Ok(())
    }

    pub(crate) fn do_unassign_attack(&mut self, player: PlayerId, uids: &[EntityId]) -> Result<()> {
        self.check_declaring(player)?;
        self.attacks.assigned.retain(|(a, _)| !uids.contains(a));
        Ok(())
    }

    /// Commit the assigned attacks plus `pairs`.
    pub(crate) fn do_submit_attack(&mut self, player: PlayerId, pairs: &[AttackPair]) -> Result<()> {
        self.check_declaring(player)?;
        let mut declaration = Vec::with_capacity(self.attacks.assigned.len() + pairs.len());
        for &pair in self.attacks.assigned.iter().chain(pairs) {
            self.check_pair(pair, &declaration)?;
            declaration.push(pair);
        }

        self.attacks.assigned.clear();
        self.attacks.declared = true;
        for &pair in &declaration {
            self.commit_attack(player, pair)?;
        }
        debug!(%player, attackers = declaration.len(), "attack declared");
        self.settle()
    }

    /// Exhaust the attacker and record the attack.
    pub(crate) fn commit_attack(&mut self, player: PlayerId, (attacker, target): AttackPair) -> Result<()> {
        self.require_card_mut(attacker)?.exhausted = true;
        self.attacks.committed.push((attacker, target));
        let event = ClientEvent::new(EventKind::AttackDeclared).with_uids([attacker, target]);
        self.events.public(player, event);
        self.enqueue(TriggerContext::about(TriggerEvent::Attack, attacker).with_player(player));
        Ok(())
    }

    /// Deal damage for every committed attack that is still valid.
    pub(crate) fn combat_damage(&mut self) -> Result<()> {
        let attacker_side = self.active;
        let committed = std::mem::take(&mut self.attacks.committed);

        for (attacker, target) in committed {
            if !self.zones.on_board(attacker) || self.zones.controller(attacker) != Some(attacker_side) {
                continue;
            }
            let strike = self.attack(attacker);
            match target.as_player() {
                Some(_) => {
                    self.deal_damage(attacker_side, Some(attacker), target, strike)?;
                }
                None => {
                    if self.zones.controller(target) != Some(attacker_side.opponent()) {
                        continue;
                    }
                    let back = self.attack(target);
                    self.deal_damage(attacker_side, Some(attacker), target, strike)?;
                    self.deal_damage(attacker_side.opponent(), Some(target), attacker, back)?;
                }
            }
            let event = ClientEvent::new(EventKind::CombatDamage)
                .with_uids([attacker, target])
                .with_amount(strike);
            self.events.public(attacker_side, event);
        }
        self.check_state()
    }
}
