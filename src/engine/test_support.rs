//! Shared fixtures for unit tests.

use std::sync::Arc;

use super::Match;
use crate::cards::{CardDefinition, CardId, CardRegistry, Tribe};
use crate::core::{EntityId, MatchConfig, Phase, PlayerId, PlayerMap};
use crate::effects::{Effect, EffectKind, Scope, TargetFilter, TargetType};
use crate::passives::{PassiveDefinition, PassiveEngine, PassiveKind, PassiveTarget};
use crate::zones::Zone;

pub fn grunt_id() -> CardId {
    CardId::new(1)
}

pub fn knight_id() -> CardId {
    CardId::new(2)
}

pub fn warded_id() -> CardId {
    CardId::new(3)
}

pub fn captain_id() -> CardId {
    CardId::new(4)
}

pub fn bolt_id() -> CardId {
    CardId::new(5)
}

fn base_cards() -> Vec<CardDefinition> {
    vec![
        CardDefinition::summon(grunt_id(), "Goblin Grunt", 1, 2, 1).with_tribe(Tribe::Goblin),
        CardDefinition::summon(knight_id(), "Knight", 3, 2, 3).with_tribe(Tribe::Human),
        CardDefinition::summon(warded_id(), "Warded Spirit", 2, 1, 3)
            .with_tribe(Tribe::Spirit)
            .with_passive(PassiveDefinition::new(PassiveKind::Untargetable, PassiveTarget::SelfCard)),
        CardDefinition::summon(captain_id(), "Goblin Captain", 2, 2, 2)
            .with_tribe(Tribe::Goblin)
            .with_passive(
                PassiveDefinition::new(
                    PassiveKind::StatBoost { attack: 1, defense: 0 },
                    PassiveTarget::FriendlyCreatures,
                )
                .with_filter(
                    TargetFilter::any()
                        .with_tribe(Tribe::Goblin)
                        .with_scope(Scope::OthersOnly),
                ),
            ),
        CardDefinition::spell(bolt_id(), "Firebolt", 2)
            .with_effect(Effect::new(EffectKind::Damage, TargetType::AnyTarget).with_fixed(3)),
    ]
}

/// Registry with the base test cards.
pub fn test_registry() -> Arc<CardRegistry> {
    registry_with(Vec::new())
}

fn registry_with(extra: Vec<CardDefinition>) -> Arc<CardRegistry> {
    let registry = CardRegistry::from_definitions(base_cards().into_iter().chain(extra))
        .expect("test card ids are unique");
    Arc::new(registry)
}

/// A started match with empty decks, parked in Player 0's first main phase.
pub struct MatchFixture {
    pub game: Match,
}

impl MatchFixture {
    pub fn new() -> Self {
        Self::with_extra(Vec::new())
    }

    /// Base cards plus `extra` definitions.
    pub fn with_extra(extra: Vec<CardDefinition>) -> Self {
        let config = MatchConfig::new(7)
            .with_opening_hand(0)
            .with_first_player(PlayerId::new(0));
        let decks = PlayerMap::new(|_| Vec::new());
        let mut game = Match::new(config, registry_with(extra), decks).expect("fixture match starts");
        game.phase = Phase::Main;
        game.priority.reset_to(game.active);
        for player in PlayerId::ALL {
            game.drain_events(player);
        }
        Self { game }
    }

    pub fn p0(&self) -> PlayerId {
        PlayerId::new(0)
    }

    pub fn p1(&self) -> PlayerId {
        PlayerId::new(1)
    }

    fn spawn(&mut self, player: PlayerId, id: CardId, zone: Zone) -> EntityId {
        self.game.spawn_card(player, id, zone).expect("fixture card spawns")
    }

    /// A ready creature, passives refreshed.
    pub fn put_on_board(&mut self, player: PlayerId, id: CardId) -> EntityId {
        let token = self.game.registry.require(id).map(|d| d.token.is_some()).unwrap_or(false);
        let zone = if token { Zone::Tokens } else { Zone::Play };
        let uid = self.spawn(player, id, zone);
        self.refresh();
        uid
    }

    pub fn put_in_hand(&mut self, player: PlayerId, id: CardId) -> EntityId {
        let uid = self.spawn(player, id, Zone::Hand);
        self.refresh();
        uid
    }

    /// On top of the deck.
    pub fn put_in_deck(&mut self, player: PlayerId, id: CardId) -> EntityId {
        self.spawn(player, id, Zone::Deck)
    }

    pub fn refresh(&mut self) {
        PassiveEngine::refresh(&mut self.game);
    }
}

/// Fixture match with the given boards; uids are returned Player 0's first.
pub fn board_with(p0: &[CardId], p1: &[CardId]) -> (Match, Vec<EntityId>) {
    let mut fixture = MatchFixture::new();
    let mut uids = Vec::with_capacity(p0.len() + p1.len());
    for &id in p0 {
        uids.push(fixture.put_on_board(PlayerId::new(0), id));
    }
    for &id in p1 {
        uids.push(fixture.put_on_board(PlayerId::new(1), id));
    }
    (fixture.game, uids)
}
