//! State-based checks: lethal damage and match end.

use tracing::{debug, info};

use super::{Match, MatchOutcome};
use crate::core::{EntityId, PlayerId};
use crate::error::Result;
use crate::events::{ClientEvent, EventKind};
use crate::passives::{PassiveEngine, RefreshReport};

impl Match {
    pub(crate) fn refresh_passives(&mut self) -> RefreshReport {
        PassiveEngine::refresh(self)
    }

    /// Creatures out of defense die together; repeat until nothing else dies,
    /// then see whether the match is over.
    pub(crate) fn check_state(&mut self) -> Result<()> {
        if self.outcome.is_some() {
            return Ok(());
        }
        loop {
            self.refresh_passives();
            let dead: Vec<EntityId> = PlayerId::ALL
                .into_iter()
                .flat_map(|p| self.zones.board(p).collect::<Vec<_>>())
                .filter(|&uid| self.remaining_defense(uid) <= 0)
                .collect();
            if dead.is_empty() {
                break;
            }
            debug!(count = dead.len(), "state check deaths");
            for uid in dead {
                self.destroy(uid)?;
            }
        }
        self.check_losses();
        Ok(())
    }

    fn check_losses(&mut self) {
        let lost: Vec<PlayerId> = PlayerId::ALL
            .into_iter()
            .filter(|&p| self.players[p].life <= 0 || self.players[p].decked)
            .collect();
        let outcome = match lost.as_slice() {
            [] => return,
            [loser] => MatchOutcome::Winner(loser.opponent()),
            _ => MatchOutcome::Draw,
        };

        info!(?outcome, turn = self.turn, "match over");
        self.outcome = Some(outcome);
        self.pending = None;
        let event = match outcome {
            MatchOutcome::Winner(winner) => ClientEvent::new(EventKind::MatchEnded)
                .with_uids([EntityId::player(winner)])
                .with_message("winner"),
            MatchOutcome::Draw => ClientEvent::new(EventKind::MatchEnded).with_message("draw"),
        };
        self.events.public(self.active, event);
    }
}
