//! Board mutation primitives.
//!
//! Every card movement, life change and draw goes through one of these so
//! that `last_controller`, overlays, events and trigger contexts stay in
//! step with the zone lists.

use tracing::debug;

use super::Match;
use crate::cards::TokenKind;
use crate::core::{EntityId, PlayerId};
use crate::error::Result;
use crate::events::{ClientEvent, EventKind};
use crate::triggers::{TriggerContext, TriggerEvent};
use crate::zones::{Zone, ZonePosition};

impl Match {
    pub(crate) fn enqueue(&mut self, ctx: TriggerContext) {
        self.trigger_queue.push_back(ctx);
    }

    /// Public event about an optional card.
    pub(crate) fn emit(&mut self, actor: PlayerId, kind: EventKind, card: Option<EntityId>, amount: i32) {
        let event = ClientEvent::new(kind)
            .with_card(card.and_then(|uid| self.snapshot(uid)))
            .with_uids(card)
            .with_amount(amount);
        self.events.public(actor, event);
    }

    /// Move a card, keeping the instance overlays consistent.
    ///
    /// Leaving a board records the controller it left from and clears
    /// counters, damage and grants.
    pub(crate) fn relocate(
        &mut self,
        uid: EntityId,
        holder: PlayerId,
        zone: Zone,
        position: ZonePosition,
    ) -> Result<(PlayerId, Zone)> {
        let (from_player, from_zone) = self.zones.move_to(uid, holder, zone, position)?;
        let card = self.require_card_mut(uid)?;
        if from_zone.is_board() {
            card.last_controller = Some(from_player);
            if !zone.is_board() {
                card.reset_overlays();
            }
        }
        Ok((from_player, from_zone))
    }

    /// Graveyard for cards, exile for tokens. Always the owner's.
    pub(crate) fn bury(&mut self, uid: EntityId) -> Result<Zone> {
        let card = self.require_card(uid)?;
        let (owner, zone) = if card.token {
            (card.owner, Zone::Exile)
        } else {
            (card.owner, Zone::Graveyard)
        };
        self.relocate(uid, owner, zone, ZonePosition::Top)?;
        Ok(zone)
    }

    /// Draw up to `count` cards. Drawing from an empty deck marks the
    /// player as decked.
    pub(crate) fn draw_cards(&mut self, player: PlayerId, count: usize) -> Result<Vec<EntityId>> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(uid) = self.zones.top(player, Zone::Deck) else {
                debug!(%player, "drew from an empty deck");
                self.players[player].decked = true;
                break;
            };
            self.relocate(uid, player, Zone::Hand, ZonePosition::Top)?;
            self.players[player].cards_drawn_this_turn += 1;

            let own = ClientEvent::new(EventKind::CardDrawn)
                .with_card(self.snapshot(uid))
                .with_uids([uid]);
            let other = ClientEvent::new(EventKind::CardDrawn);
            self.events.split(player, own, other);
            self.enqueue(TriggerContext::about(TriggerEvent::Draw, uid).with_player(player));
            drawn.push(uid);
        }
        Ok(drawn)
    }

    /// Hand card to its owner's graveyard.
    pub(crate) fn discard(&mut self, uid: EntityId) -> Result<()> {
        let player = self.zones.controller(uid).unwrap_or(self.require_card(uid)?.owner);
        self.bury(uid)?;
        self.emit(player, EventKind::Discarded, Some(uid), 0);
        self.enqueue(TriggerContext::about(TriggerEvent::Discard, uid).with_player(player));
        Ok(())
    }

    /// Top `count` deck cards to the graveyard.
    pub(crate) fn mill(&mut self, player: PlayerId, count: usize) -> Result<Vec<EntityId>> {
        let milled = self.zones.top_n(player, Zone::Deck, count);
        for &uid in &milled {
            self.bury(uid)?;
            self.emit(player, EventKind::Milled, Some(uid), 0);
            self.enqueue(TriggerContext::about(TriggerEvent::Mill, uid).with_player(player));
        }
        Ok(milled)
    }

    /// Destroy a board creature. Returns false when it was not on a board.
    pub(crate) fn destroy(&mut self, uid: EntityId) -> Result<bool> {
        let Some(controller) = self.zones.on_board(uid).then(|| self.zones.controller(uid)).flatten() else {
            return Ok(false);
        };
        self.bury(uid)?;
        self.emit(controller, EventKind::CreatureDied, Some(uid), 0);
        self.enqueue(TriggerContext::about(TriggerEvent::Death, uid).with_player(controller));
        Ok(true)
    }

    /// Take a board card out of play into its owner's `zone`. Tokens always
    /// go to exile.
    pub(crate) fn remove_from_play(&mut self, uid: EntityId, zone: Zone) -> Result<bool> {
        let Some(controller) = self.zones.on_board(uid).then(|| self.zones.controller(uid)).flatten() else {
            return Ok(false);
        };
        let card = self.require_card(uid)?;
        let owner = card.owner;
        let zone = if card.token { Zone::Exile } else { zone };
        self.relocate(uid, owner, zone, ZonePosition::Top)?;
        self.emit(controller, EventKind::CardMoved, Some(uid), 0);
        self.enqueue(TriggerContext::about(TriggerEvent::LeftPlay, uid).with_player(controller));
        Ok(true)
    }

    /// Put a card onto `player`'s board as a fresh arrival.
    pub(crate) fn enter_play(&mut self, uid: EntityId, player: PlayerId) -> Result<()> {
        let zone = if self.require_card(uid)?.token {
            Zone::Tokens
        } else {
            Zone::Play
        };
        self.relocate(uid, player, zone, ZonePosition::Top)?;
        self.require_card_mut(uid)?.summoning_sick = true;
        self.enqueue(TriggerContext::about(TriggerEvent::Summon, uid).with_player(player));
        Ok(())
    }

    /// Add `delta` to a player's life.
    pub(crate) fn change_life(&mut self, player: PlayerId, delta: i32) {
        if delta == 0 {
            return;
        }
        self.players[player].life += delta;
        let event = ClientEvent::new(EventKind::LifeChanged)
            .with_uids([EntityId::player(player)])
            .with_amount(delta);
        self.events.public(player, event);
    }

    /// Deal damage after reductions. Returns the damage actually dealt.
    pub(crate) fn deal_damage(
        &mut self,
        actor: PlayerId,
        source: Option<EntityId>,
        target: EntityId,
        amount: i32,
    ) -> Result<i32> {
        let dealt = (amount - self.damage_reduction(target)).max(0);
        if dealt == 0 {
            return Ok(0);
        }

        match target.as_player() {
            Some(player) => self.change_life(player, -dealt),
            None => {
                if !self.zones.on_board(target) {
                    return Ok(0);
                }
                self.require_card_mut(target)?.damage += dealt;
                self.enqueue(
                    TriggerContext::about(TriggerEvent::DamageTaken, target)
                        .with_player(actor)
                        .with_amount(dealt),
                );
            }
        }

        let event = ClientEvent::new(EventKind::DamageDealt)
            .with_uids(source.into_iter().chain([target]))
            .with_amount(dealt);
        self.events.public(actor, event);
        Ok(dealt)
    }

    /// Create a token on `player`'s board.
    pub(crate) fn create_token(&mut self, player: PlayerId, kind: TokenKind) -> Result<EntityId> {
        let uid = self.spawn_card(player, kind.card_id(), Zone::Tokens)?;
        self.require_card_mut(uid)?.summoning_sick = true;
        self.emit(player, EventKind::TokenCreated, Some(uid), 0);
        self.enqueue(TriggerContext::about(TriggerEvent::Summon, uid).with_player(player));
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{grunt_id, knight_id, MatchFixture};

    #[test]
    fn test_draw_from_empty_deck_marks_decked() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let top = fixture.put_in_deck(p0, grunt_id());

        let drawn = fixture.game.draw_cards(p0, 2).unwrap();

        assert_eq!(drawn, vec![top]);
        assert!(fixture.game.players[p0].decked);
        assert_eq!(fixture.game.players[p0].cards_drawn_this_turn, 1);
    }

    #[test]
    fn test_draw_hides_identity_from_opponent() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let uid = fixture.put_in_deck(p0, knight_id());
        fixture.game.drain_events(p0);
        fixture.game.drain_events(p0.opponent());

        fixture.game.draw_cards(p0, 1).unwrap();

        let mine = fixture.game.drain_events(p0);
        let theirs = fixture.game.drain_events(p0.opponent());
        assert_eq!(mine[0].uids, vec![uid]);
        assert!(mine[0].card.is_some());
        assert!(theirs[0].uids.is_empty());
        assert!(theirs[0].card.is_none());
    }

    #[test]
    fn test_leaving_board_records_controller_and_clears_overlays() {
        let mut fixture = MatchFixture::new();
        let p1 = fixture.p1();
        let uid = fixture.put_on_board(p1, knight_id());
        fixture.game.card_mut(uid).unwrap().plus_counters = 2;

        assert!(fixture.game.destroy(uid).unwrap());

        let card = fixture.game.card(uid).unwrap();
        assert_eq!(card.last_controller, Some(p1));
        assert_eq!(card.plus_counters, 0);
        assert_eq!(fixture.game.zone_of(uid), Some(Zone::Graveyard));
        assert!(!fixture.game.destroy(uid).unwrap());
    }

    #[test]
    fn test_tokens_are_exiled_instead_of_buried() {
        let mut fixture = MatchFixture::new();
        let p0 = fixture.p0();
        let token = fixture.game.create_token(p0, TokenKind::Wolf).unwrap();
        assert_eq!(fixture.game.zone_of(token), Some(Zone::Tokens));

        fixture.game.remove_from_play(token, Zone::Hand).unwrap();

        assert_eq!(fixture.game.zone_of(token), Some(Zone::Exile));
    }

    #[test]
    fn test_damage_to_player_changes_life() {
        let mut fixture = MatchFixture::new();
        let p1 = fixture.p1();
        let before = fixture.game.life(p1);

        let dealt = fixture
            .game
            .deal_damage(p1.opponent(), None, EntityId::player(p1), 3)
            .unwrap();

        assert_eq!(dealt, 3);
        assert_eq!(fixture.game.life(p1), before - 3);
    }
}
