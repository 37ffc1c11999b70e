//! Trigger processing between player actions.

use tracing::debug;

use super::Match;
use crate::error::Result;
use crate::negotiation::PendingInteraction;
use crate::triggers::TriggerDetector;

impl Match {
    /// Run queued work until a decision is needed or nothing is left.
    ///
    /// Ready triggers are negotiated first, then unordered batches are
    /// ordered, then the next queued context is detected.
    pub(crate) fn settle(&mut self) -> Result<()> {
        loop {
            if self.outcome.is_some() || self.pending.is_some() {
                return Ok(());
            }
            self.check_state()?;
            if self.outcome.is_some() {
                return Ok(());
            }

            if let Some(trigger) = self.ready_triggers.pop_front() {
                self.negotiate_trigger(trigger)?;
                continue;
            }

            if let Some((player, mut batch)) = self.unordered.pop_front() {
                if batch.len() == 1 {
                    self.ready_triggers.extend(batch.pop());
                } else {
                    debug!(%player, count = batch.len(), "trigger order requested");
                    self.request(player, PendingInteraction::OrderTriggers { triggers: batch });
                }
                continue;
            }

            let Some(ctx) = self.trigger_queue.pop_front() else {
                return Ok(());
            };
            let detection = TriggerDetector::detect(self, &ctx);
            if detection.is_empty() {
                continue;
            }

            let mut spent = detection.spent_delayed;
            spent.sort_unstable_by(|a, b| b.cmp(a));
            spent.dedup();
            for index in spent {
                if index < self.delayed.len() {
                    self.delayed.remove(index);
                }
            }

            let mut fired = detection.fired;
            for player in self.active.and_opponent() {
                let batch = std::mem::take(fired.get_mut(player));
                if !batch.is_empty() {
                    self.unordered.push_back((player, batch));
                }
            }
            self.priority.reset_to(self.active);
        }
    }
}
