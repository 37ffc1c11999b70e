//! Shared cards and drivers for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use duel_engine::effects::Cost;
use duel_engine::{
    ActivatedAbility, CardDefinition, CardId, CardRegistry, Condition, Effect, EffectKind, EntityId, Match, MatchConfig, Phase,
    PlayerId, PlayerMap, TargetFilter, TargetType, TokenKind, TriggerDefinition, TriggerEvent, TriggerSubject, Tribe,
};

pub const GRUNT: CardId = CardId::new(1);
pub const KNIGHT: CardId = CardId::new(2);
pub const WARLORD: CardId = CardId::new(3);
pub const JOLT: CardId = CardId::new(4);
pub const OMEN: CardId = CardId::new(5);
pub const MIND_THEFT: CardId = CardId::new(6);
pub const HERALD: CardId = CardId::new(7);
pub const SNIPER: CardId = CardId::new(8);
pub const TOTEM: CardId = CardId::new(9);
pub const GOBLIN_CALL: CardId = CardId::new(10);
pub const OGRE: CardId = CardId::new(11);
pub const LAST_STAND: CardId = CardId::new(12);
pub const SCORCH: CardId = CardId::new(13);

pub fn registry() -> Arc<CardRegistry> {
    let cards = vec![
        CardDefinition::summon(GRUNT, "Goblin Grunt", 1, 2, 1).with_tribe(Tribe::Goblin),
        CardDefinition::summon(KNIGHT, "Knight", 3, 2, 3).with_tribe(Tribe::Human),
        CardDefinition::summon(WARLORD, "Goblin Warlord", 1, 4, 4).with_additional_cost(Cost::Sacrifice {
            filter: TargetFilter::any().with_tribe(Tribe::Goblin),
            count: 1,
        }),
        CardDefinition::spell(JOLT, "Jolt", 2)
            .with_effect(Effect::new(EffectKind::Damage, TargetType::Opponent).with_fixed(2)),
        CardDefinition::spell(OMEN, "Omen", 1)
            .with_effect(Effect::new(EffectKind::Draw, TargetType::Controller).optional())
            .with_effect(Effect::new(EffectKind::LoseLife, TargetType::Opponent).with_fixed(2)),
        CardDefinition::spell(MIND_THEFT, "Mind Theft", 4)
            .with_effect(Effect::new(EffectKind::TakeControl, TargetType::EnemyCreature)),
        CardDefinition::summon(HERALD, "Herald", 1, 1, 1).with_trigger(
            TriggerDefinition::new(TriggerEvent::Summon)
                .with_subject(TriggerSubject::SelfCard)
                .with_effect(Effect::new(EffectKind::Damage, TargetType::Opponent).with_fixed(1)),
        ),
        CardDefinition::summon(SNIPER, "Sniper", 2, 1, 1).with_trigger(
            TriggerDefinition::new(TriggerEvent::Summon)
                .with_subject(TriggerSubject::SelfCard)
                .with_effect(Effect::new(EffectKind::Damage, TargetType::EnemyCreature).with_fixed(1)),
        ),
        CardDefinition::summon(TOTEM, "Totem", 1, 0, 3).with_ability(ActivatedAbility::new(
            "Ping",
            vec![Cost::ExhaustSelf],
            vec![Effect::new(EffectKind::Damage, TargetType::Opponent).with_fixed(1)],
        )),
        CardDefinition::spell(GOBLIN_CALL, "Goblin Call", 1).with_effect(
            Effect::new(EffectKind::SummonToken(TokenKind::Goblin), TargetType::Controller).with_fixed(1),
        ),
        CardDefinition::summon(OGRE, "Ogre", 2, 4, 4).with_tribute(TargetFilter::any().with_tribe(Tribe::Goblin), 1),
        CardDefinition::spell(LAST_STAND, "Last Stand", 1)
            .with_cast_condition(Condition::ControllerLifeAtMost(10))
            .with_effect(Effect::new(EffectKind::Heal, TargetType::Controller).with_fixed(5)),
        CardDefinition::spell(SCORCH, "Scorch", 3)
            .with_effect(Effect::new(EffectKind::Damage, TargetType::Opponent).with_fixed(3)),
    ];
    Arc::new(CardRegistry::from_definitions(cards).expect("card ids are unique"))
}

pub fn p0() -> PlayerId {
    PlayerId::new(0)
}

pub fn p1() -> PlayerId {
    PlayerId::new(1)
}

/// A match where Player 0 goes first, with single-card decks.
pub fn start(config: MatchConfig, deck0: CardId, deck1: CardId) -> Match {
    let decks = PlayerMap::from_pair(vec![deck0; 20], vec![deck1; 20]);
    Match::new(config.with_first_player(p0()), registry(), decks).expect("match starts")
}

/// Pass with whoever holds priority, then with the other player.
pub fn pass_both(game: &mut Match) {
    let first = game.priority_player().expect("someone holds priority");
    game.pass_priority(first).expect("first pass");
    game.pass_priority(first.opponent()).expect("second pass");
}

/// Pass until the match reaches `phase` of `turn`.
pub fn pass_until(game: &mut Match, turn: u32, phase: Phase) {
    for _ in 0..200 {
        if game.turn() == turn && game.phase() == phase {
            return;
        }
        pass_both(game);
    }
    panic!("never reached turn {} {:?}", turn, phase);
}

/// Cast a card that needs no answers and let it resolve.
pub fn cast_and_resolve(game: &mut Match, player: PlayerId, card: EntityId) {
    game.attempt_to_cast(player, card).expect("cast accepted");
    assert!(game.pending().is_none(), "cast asked for a decision");
    pass_both(game);
}
