//! Priority tracking.
//!
//! Priority alternates between the two players. Two consecutive passes
//! mean "nothing more to add": the caller then resolves the top of the
//! stack, or advances the phase when the stack is empty.
//!
//! Any push, detection or resolution resets the pass count.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PLAYER_COUNT};

/// Who may act next, and how many passes in a row have happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTracker {
    holder: PlayerId,
    consecutive_passes: usize,
}

impl PriorityTracker {
    /// Start with `holder` holding priority.
    #[must_use]
    pub fn new(holder: PlayerId) -> Self {
        Self {
            holder,
            consecutive_passes: 0,
        }
    }

    /// Player currently holding priority.
    #[must_use]
    pub fn holder(&self) -> PlayerId {
        self.holder
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    /// Record a pass by the holder.
    ///
    /// Returns `true` once both players have passed in a row. Otherwise
    /// priority moves to the opponent.
    pub fn pass(&mut self) -> bool {
        self.consecutive_passes += 1;
        if self.consecutive_passes >= PLAYER_COUNT {
            true
        } else {
            self.holder = self.holder.opponent();
            false
        }
    }

    /// Give priority to `player` and forget earlier passes.
    ///
    /// Used after a push (the pusher keeps priority) and after a
    /// resolution or phase change (the active player receives it).
    pub fn reset_to(&mut self, player: PlayerId) {
        self.holder = player;
        self.consecutive_passes = 0;
    }
}
