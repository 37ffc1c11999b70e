//! Activated abilities and tribute summons over real turns.

mod common;

use common::{cast_and_resolve, p0, p1, pass_both, pass_until, registry, start, GOBLIN_CALL, GRUNT, OGRE, TOTEM};
use duel_engine::{
    EventKind, Match, MatchConfig, NegotiationRequest, PendingInteraction, Phase, PlayerMap, StackOrigin, Zone,
};

// =============================================================================
// Activation
// =============================================================================

/// An exhaust ability waits out summoning sickness and then works once a turn.
#[test]
fn test_exhaust_ability_after_sickness() {
    let mut game = start(MatchConfig::new(61), TOTEM, GRUNT);
    pass_until(&mut game, 1, Phase::Main);
    let totem = game.cards_in(p0(), Zone::Hand)[0];
    cast_and_resolve(&mut game, p0(), totem);

    assert!(game.activatable_abilities(p0()).is_empty());
    assert!(game.attempt_to_activate(p0(), totem, 0).is_err());

    pass_until(&mut game, 3, Phase::Main);
    assert_eq!(game.activatable_abilities(p0()), vec![(totem, 0)]);
    game.drain_events(p1());

    game.attempt_to_activate(p0(), totem, 0).unwrap();
    assert_eq!(game.stack().len(), 1);
    assert_eq!(game.stack()[0].origin, StackOrigin::Ability);
    assert!(game.card(totem).unwrap().exhausted);
    assert!(game
        .drain_events(p1())
        .iter()
        .any(|e| e.kind == EventKind::AbilityActivated));

    pass_both(&mut game);

    assert_eq!(game.life(p1()), 19);
    assert!(game.activatable_abilities(p0()).is_empty());
}

/// Only the controller can activate a card's abilities.
#[test]
fn test_opponent_cannot_activate() {
    let mut game = start(MatchConfig::new(62), TOTEM, GRUNT);
    pass_until(&mut game, 1, Phase::Main);
    let totem = game.cards_in(p0(), Zone::Hand)[0];
    cast_and_resolve(&mut game, p0(), totem);

    pass_until(&mut game, 2, Phase::Main);
    assert!(game.attempt_to_activate(p1(), totem, 0).is_err());
    assert!(game.activatable_abilities(p1()).is_empty());
}

// =============================================================================
// Tribute
// =============================================================================

fn tribute_match() -> Match {
    let mut deck = vec![GOBLIN_CALL; 10];
    deck.extend([OGRE; 10]);
    let config = MatchConfig::new(63).with_first_player(p0()).with_opening_hand(12);
    Match::new(config, registry(), PlayerMap::from_pair(deck, vec![GRUNT; 20])).unwrap()
}

/// The ogre needs a goblin on the board and asks which one to give up.
#[test]
fn test_tribute_summon_consumes_goblin() {
    let mut game = tribute_match();
    pass_until(&mut game, 1, Phase::Main);

    let hand = game.cards_in(p0(), Zone::Hand).to_vec();
    let call = *hand.iter().find(|&&uid| game.card(uid).unwrap().card_id == GOBLIN_CALL).unwrap();
    let ogre = *hand.iter().find(|&&uid| game.card(uid).unwrap().card_id == OGRE).unwrap();
    assert!(!game.playable_cards(p0()).contains(&ogre));

    cast_and_resolve(&mut game, p0(), call);
    let token = game.cards_in(p0(), Zone::Tokens)[0];
    assert!(game.playable_cards(p0()).contains(&ogre));

    game.attempt_to_cast(p0(), ogre).unwrap();
    match game.pending().map(|p| &p.interaction) {
        Some(PendingInteraction::Negotiation {
            request: NegotiationRequest::Tribute { candidates, count },
            ..
        }) => {
            assert_eq!(candidates, &vec![token]);
            assert_eq!(*count, 1);
        }
        other => panic!("unexpected pending {:?}", other),
    }
    assert_eq!(game.life(p0()), 19);

    game.select_tribute(p0(), &[token]).unwrap();
    assert!(game.cards_in(p0(), Zone::Tokens).is_empty());
    assert_eq!(game.life(p0()), 17);

    pass_both(&mut game);
    assert_eq!(game.zone_of(ogre), Some(Zone::Play));
}
