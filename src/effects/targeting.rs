//! Effect targeting.
//!
//! Target selection works in two layers:
//! - a universe per `TargetType` (board cards, players, hand, graveyards,
//!   cards on the stack)
//! - a type-specific eligibility test (untargetable passives, friendly or
//!   enemy direction, stack membership for counters), then the effect's
//!   own qualifier
//!
//! `possible_targets` is what the player is offered. The same test runs
//! again at resolution time, and targets that no longer pass are dropped.

use super::effect::{Effect, EffectKind, TargetType};
use super::qualifier::{qualify, Qualifier};
use crate::core::{EntityId, PlayerId};
use crate::engine::Match;
use crate::passives::PassiveKind;
use crate::zones::Zone;

/// Every entity a target type could ever refer to, before eligibility.
pub fn universe(game: &Match, player: PlayerId, target: TargetType) -> Vec<EntityId> {
    let players = [EntityId::player(player), EntityId::player(player.opponent())];

    match target {
        TargetType::AnyPlayer => players.to_vec(),
        TargetType::AnyTarget => players
            .into_iter()
            .chain(game.zones.both_boards(player))
            .collect(),
        t if t.includes_board() => game.zones.both_boards(player).collect(),
        TargetType::HandCard => game.zones.cards(player, Zone::Hand).to_vec(),
        TargetType::GraveyardCard => game
            .zones
            .cards(player, Zone::Graveyard)
            .iter()
            .chain(game.zones.cards(player.opponent(), Zone::Graveyard))
            .copied()
            .collect(),
        TargetType::StackItem => game
            .stack
            .iter()
            .rev()
            .map(|obj| obj.source)
            .filter(|&uid| game.zones.is_in(uid, Zone::Stack))
            .collect(),
        _ => Vec::new(),
    }
}

/// Target-type-specific eligibility, independent of the effect's filter.
///
/// `targeted` is false for mass effects, which ignore untargetability.
pub fn is_eligible(
    game: &Match,
    player: PlayerId,
    effect: &Effect,
    candidate: EntityId,
    targeted: bool,
) -> bool {
    let side = match candidate.as_player() {
        Some(p) => Some(p),
        None => game.zones.controller(candidate),
    };
    let Some(side) = side else {
        return false;
    };

    let in_universe = match effect.target {
        TargetType::AnyPlayer => candidate.is_player(),
        TargetType::AnyTarget => candidate.is_player() || game.zones.on_board(candidate),
        TargetType::Creature | TargetType::AllCreatures => game.zones.on_board(candidate),
        TargetType::FriendlyCreature | TargetType::AllFriendly => {
            game.zones.on_board(candidate) && side == player
        }
        TargetType::EnemyCreature | TargetType::AllEnemy => {
            game.zones.on_board(candidate) && side != player
        }
        TargetType::HandCard => side == player && game.zones.is_in(candidate, Zone::Hand),
        TargetType::GraveyardCard => game.zones.is_in(candidate, Zone::Graveyard),
        TargetType::StackItem => {
            game.zones.is_in(candidate, Zone::Stack)
                && effect.source != Some(candidate)
                && game.stack.iter().any(|obj| obj.source == candidate)
        }
        _ => true,
    };
    if !in_universe {
        return false;
    }

    if targeted && side != player && game.has_passive(candidate, &PassiveKind::Untargetable) {
        return false;
    }

    // Counters only make sense against cards still waiting to resolve.
    if matches!(effect.kind, EffectKind::Counter) && !game.zones.is_in(candidate, Zone::Stack) {
        return false;
    }

    true
}

/// Full legality test: eligibility, then the effect's qualifier.
pub fn is_legal_target(game: &Match, player: PlayerId, effect: &Effect, candidate: EntityId) -> bool {
    let targeted = effect.target.needs_selection();
    is_eligible(game, player, effect, candidate, targeted)
        && qualify(game, candidate, &Qualifier::new(player, effect.source, &effect.filter))
}

/// Targets `player` may pick for `effect` right now.
pub fn possible_targets(game: &Match, player: PlayerId, effect: &Effect) -> Vec<EntityId> {
    universe(game, player, effect.target)
        .into_iter()
        .filter(|&uid| is_legal_target(game, player, effect, uid))
        .collect()
}

/// Does every selection-type effect in the list have enough legal targets?
pub fn has_required_targets(game: &Match, player: PlayerId, effects: &[Effect]) -> bool {
    effects
        .iter()
        .filter(|e| e.needs_targets())
        .all(|e| !possible_targets(game, player, e).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::BindSource;
    use crate::effects::{Restriction, TargetFilter};
    use crate::engine::test_support::{board_with, grunt_id, knight_id, warded_id};

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    #[test]
    fn test_any_target_universe() {
        let (game, uids) = board_with(&[grunt_id()], &[knight_id()]);
        let effect = Effect::new(EffectKind::Damage, TargetType::AnyTarget).bound_to(uids[0]);

        let targets = possible_targets(&game, P0, &effect);
        assert_eq!(
            targets,
            vec![EntityId::player(P0), EntityId::player(P1), uids[0], uids[1]]
        );
    }

    #[test]
    fn test_direction_filters() {
        let (game, uids) = board_with(&[grunt_id()], &[knight_id()]);

        let friendly = Effect::new(EffectKind::Heal, TargetType::FriendlyCreature);
        assert_eq!(possible_targets(&game, P0, &friendly), vec![uids[0]]);

        let enemy = Effect::new(EffectKind::Destroy, TargetType::EnemyCreature);
        assert_eq!(possible_targets(&game, P0, &enemy), vec![uids[1]]);
        assert_eq!(possible_targets(&game, P1, &enemy), vec![uids[0]]);
    }

    #[test]
    fn test_untargetable_against_opponents_only() {
        let (game, uids) = board_with(&[warded_id()], &[]);
        let destroy = Effect::new(EffectKind::Destroy, TargetType::Creature);

        assert!(possible_targets(&game, P1, &destroy).is_empty());
        assert_eq!(possible_targets(&game, P0, &destroy), vec![uids[0]]);

        let sweep = Effect::new(EffectKind::Destroy, TargetType::AllCreatures);
        assert!(is_eligible(&game, P1, &sweep, uids[0], false));
    }

    #[test]
    fn test_filter_applies_after_eligibility() {
        let (game, uids) = board_with(&[grunt_id(), knight_id()], &[]);
        let effect = Effect::new(EffectKind::Damage, TargetType::Creature)
            .with_filter(TargetFilter::any().with_restriction(Restriction::MinAttack(3)));

        let targets = possible_targets(&game, P0, &effect);
        assert!(!targets.contains(&uids[0]));
    }

    #[test]
    fn test_required_targets() {
        let (game, _) = board_with(&[], &[]);
        let needs_creature = [Effect::new(EffectKind::Destroy, TargetType::Creature)];
        let player_only = [Effect::new(EffectKind::Draw, TargetType::Controller)];

        assert!(!has_required_targets(&game, P0, &needs_creature));
        assert!(has_required_targets(&game, P0, &player_only));
    }
}
