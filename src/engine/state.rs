//! The match: all state for one game in progress.
//!
//! `Match` owns everything: card instances (an arena indexed by uid), the
//! zone manager, the stack, priority, the trigger queue, the pending
//! interaction and the per-player event logs. Behaviour is spread over the
//! sibling modules as further `impl Match` blocks.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::combat::AttackState;
use crate::cards::{CardDefinition, CardId, CardInstance, CardRegistry, Tribe};
use crate::core::{
    EntityId, IntentRecord, MatchConfig, MatchRng, Phase, PlayerId, PlayerMap, PlayerState,
};
use crate::error::{EngineError, Result};
use crate::events::{CardSnapshot, ClientEvent, EventLog};
use crate::negotiation::Pending;
use crate::passives::{GrantedPassive, PassiveDefinition};
use crate::stack::{PriorityTracker, Stack, StackObj};
use crate::triggers::{DelayedTrigger, PendingTrigger, TriggerContext};
use crate::zones::{Zone, ZoneManager};

/// How a finished match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(PlayerId),
    Draw,
}

/// One match.
#[derive(Clone, Debug)]
pub struct Match {
    pub(crate) config: MatchConfig,
    pub(crate) registry: Arc<CardRegistry>,
    pub(crate) deck_lists: PlayerMap<Vec<CardId>>,
    pub(crate) players: PlayerMap<PlayerState>,
    /// Arena of card instances; `uid - FIRST_CARD` is the index.
    pub(crate) cards: Vec<CardInstance>,
    pub(crate) zones: ZoneManager,
    pub(crate) stack: Stack,
    pub(crate) priority: PriorityTracker,
    pub(crate) phase: Phase,
    pub(crate) turn: u32,
    pub(crate) active: PlayerId,
    pub(crate) first_player: PlayerId,
    pub(crate) rng: MatchRng,
    pub(crate) pending: Option<Pending>,
    pub(crate) trigger_queue: VecDeque<TriggerContext>,
    /// Detected triggers per player, not yet ordered.
    pub(crate) unordered: VecDeque<(PlayerId, Vec<PendingTrigger>)>,
    /// Ordered triggers waiting for their negotiation.
    pub(crate) ready_triggers: VecDeque<PendingTrigger>,
    pub(crate) delayed: Vec<DelayedTrigger>,
    pub(crate) attacks: AttackState,
    pub(crate) events: EventLog,
    pub(crate) history: im::Vector<IntentRecord>,
    pub(crate) outcome: Option<MatchOutcome>,
    /// Set while auto-stop skips phases; suppresses per-phase events.
    pub(crate) fast_forward: bool,
}

impl Match {
    /// Create a match and play it up to the first decision.
    ///
    /// Decks are shuffled, opening hands drawn and the first turn begun.
    pub fn new(
        config: MatchConfig,
        registry: Arc<CardRegistry>,
        decks: PlayerMap<Vec<CardId>>,
    ) -> Result<Self> {
        for (_, deck) in decks.iter() {
            for &id in deck {
                registry.require(id)?;
            }
        }

        let mut game = Self::blank(config, registry, decks);
        game.start()?;
        Ok(game)
    }

    fn blank(config: MatchConfig, registry: Arc<CardRegistry>, decks: PlayerMap<Vec<CardId>>) -> Self {
        let life = config.starting_life;
        let rng = MatchRng::new(config.seed);
        Self {
            registry,
            deck_lists: decks,
            players: PlayerMap::new(|_| PlayerState::new(life)),
            cards: Vec::new(),
            zones: ZoneManager::new(),
            stack: Stack::new(),
            priority: PriorityTracker::new(PlayerId::new(0)),
            phase: Phase::Draw,
            turn: 0,
            active: PlayerId::new(0),
            first_player: PlayerId::new(0),
            rng,
            pending: None,
            trigger_queue: VecDeque::new(),
            unordered: VecDeque::new(),
            ready_triggers: VecDeque::new(),
            delayed: Vec::new(),
            attacks: AttackState::default(),
            events: EventLog::new(),
            history: im::Vector::new(),
            outcome: None,
            fast_forward: false,
            config,
        }
    }

    fn start(&mut self) -> Result<()> {
        for player in PlayerId::ALL {
            let deck = self.deck_lists[player].clone();
            for id in deck {
                self.spawn_card(player, id, Zone::Deck)?;
            }
            self.zones.shuffle(player, Zone::Deck, &mut self.rng);
        }

        self.first_player = match self.config.first_player {
            Some(player) => player,
            None if self.rng.coin_flip() => PlayerId::new(0),
            None => PlayerId::new(1),
        };
        self.active = self.first_player;
        info!(seed = self.config.seed, first = %self.first_player, "match started");
        for player in PlayerId::ALL {
            self.events.public(
                player,
                ClientEvent::new(crate::events::EventKind::MatchStarted)
                    .with_uids([EntityId::player(self.first_player)]),
            );
        }

        for player in self.first_player.and_opponent() {
            self.draw_cards(player, self.config.opening_hand)?;
        }
        // Opening draws never fire Draw triggers.
        self.trigger_queue.clear();

        self.begin_turn()
    }

    /// Create a card instance in `zone` of `owner`.
    pub(crate) fn spawn_card(&mut self, owner: PlayerId, card_id: CardId, zone: Zone) -> Result<EntityId> {
        let definition = self.registry.require(card_id)?;
        let raw = EntityId::FIRST_CARD + u32::try_from(self.cards.len()).map_err(|_| {
            EngineError::invariant("card arena overflow")
        })?;
        let uid = EntityId(raw);
        let instance = if definition.token.is_some() {
            CardInstance::token(uid, card_id, owner)
        } else {
            CardInstance::new(uid, card_id, owner)
        };
        self.cards.push(instance);
        self.zones
            .add(uid, owner, zone, crate::zones::ZonePosition::Top)?;
        Ok(uid)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    fn arena_index(uid: EntityId) -> Option<usize> {
        uid.0.checked_sub(EntityId::FIRST_CARD).map(|i| i as usize)
    }

    #[must_use]
    pub fn card(&self, uid: EntityId) -> Option<&CardInstance> {
        self.cards.get(Self::arena_index(uid)?)
    }

    pub(crate) fn card_mut(&mut self, uid: EntityId) -> Option<&mut CardInstance> {
        let index = Self::arena_index(uid)?;
        self.cards.get_mut(index)
    }

    /// A card that must exist.
    pub(crate) fn require_card(&self, uid: EntityId) -> Result<&CardInstance> {
        self.card(uid)
            .ok_or_else(|| EngineError::invariant(format!("no card instance {}", uid)))
    }

    pub(crate) fn require_card_mut(&mut self, uid: EntityId) -> Result<&mut CardInstance> {
        self.card_mut(uid)
            .ok_or_else(|| EngineError::invariant(format!("no card instance {}", uid)))
    }

    /// Definition of a card instance.
    pub fn definition(&self, uid: EntityId) -> Result<&CardDefinition> {
        let card = self.require_card(uid)?;
        self.registry.require(card.card_id)
    }

    #[must_use]
    pub fn tribe_of(&self, uid: EntityId) -> Option<Tribe> {
        self.definition(uid).ok().and_then(|d| d.tribe)
    }

    /// Printed cost, ignoring modifiers.
    #[must_use]
    pub fn base_cost(&self, uid: EntityId) -> Option<i32> {
        self.definition(uid).ok().map(|d| d.cost)
    }

    /// Innate passive `index` of the card's definition.
    pub(crate) fn innate_passive(&self, uid: EntityId, index: usize) -> Option<&PassiveDefinition> {
        self.definition(uid).ok()?.passives.get(index)
    }

    /// Grant list of a card or player.
    pub(crate) fn grants_mut(&mut self, entity: EntityId) -> Option<&mut Vec<GrantedPassive>> {
        match entity.as_player() {
            Some(player) => Some(&mut self.players[player].granted),
            None => self.card_mut(entity).map(|c| &mut c.granted),
        }
    }

    #[must_use]
    pub fn life(&self, player: PlayerId) -> i32 {
        self.players[player].life
    }

    #[must_use]
    pub fn player_state(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Player holding priority, when nobody owes an answer.
    #[must_use]
    pub fn priority_player(&self) -> Option<PlayerId> {
        (self.pending.is_none() && self.outcome.is_none()).then(|| self.priority.holder())
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Cards in one of a player's zones, in order (deck top last).
    #[must_use]
    pub fn cards_in(&self, player: PlayerId, zone: Zone) -> &[EntityId] {
        self.zones.cards(player, zone)
    }

    #[must_use]
    pub fn zone_of(&self, uid: EntityId) -> Option<Zone> {
        self.zones.zone_of(uid)
    }

    #[must_use]
    pub fn controller_of(&self, uid: EntityId) -> Option<PlayerId> {
        self.zones.controller(uid)
    }

    /// Stack entries, bottom to top.
    #[must_use]
    pub fn stack(&self) -> &[StackObj] {
        self.stack.entries()
    }

    #[must_use]
    pub fn history(&self) -> &im::Vector<IntentRecord> {
        &self.history
    }

    /// Take the events produced for `player` since the last drain.
    pub fn drain_events(&mut self, player: PlayerId) -> Vec<ClientEvent> {
        self.events.drain(player)
    }

    /// Client view of a card.
    #[must_use]
    pub fn snapshot(&self, uid: EntityId) -> Option<CardSnapshot> {
        let card = self.card(uid)?;
        let definition = self.definition(uid).ok()?;
        Some(CardSnapshot {
            uid,
            card_id: card.card_id.raw(),
            name: definition.name.clone(),
            owner: card.owner,
            controller: self.zones.controller(uid),
            zone: self.zones.zone_of(uid),
            cost: self.effective_cost(uid),
            attack: self.attack(uid),
            defense: self.defense(uid),
            remaining_defense: self.remaining_defense(uid),
            token: card.token,
            exhausted: card.exhausted,
            summoning_sick: card.summoning_sick,
        })
    }

    /// Everything both players can see, plus zone sizes.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        let side = |player: PlayerId| SideSummary {
            life: self.players[player].life,
            deck: self.zones.size(player, Zone::Deck),
            hand: self.zones.cards(player, Zone::Hand).to_vec(),
            board: self.zones.board(player).collect(),
            graveyard: self.zones.cards(player, Zone::Graveyard).to_vec(),
            exile: self.zones.cards(player, Zone::Exile).to_vec(),
        };
        MatchSummary {
            turn: self.turn,
            phase: self.phase,
            active: self.active,
            stack: self.stack.iter().map(|e| e.source).collect(),
            sides: PlayerMap::new(side),
            outcome: self.outcome,
        }
    }
}

/// Comparable digest of one side of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    pub life: i32,
    pub deck: usize,
    pub hand: Vec<EntityId>,
    pub board: Vec<EntityId>,
    pub graveyard: Vec<EntityId>,
    pub exile: Vec<EntityId>,
}

/// Comparable digest of a match, used by replays and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub turn: u32,
    pub phase: Phase,
    pub active: PlayerId,
    pub stack: Vec<EntityId>,
    pub sides: PlayerMap<SideSummary>,
    pub outcome: Option<MatchOutcome>,
}
