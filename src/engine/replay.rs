//! Rebuilding a match from its seed and intent history.

use std::sync::Arc;

use tracing::debug;

use super::Match;
use crate::cards::{CardId, CardRegistry};
use crate::core::{IntentRecord, MatchConfig, PlayerMap};
use crate::error::{EngineError, Result};

/// Serialize an intent history.
pub fn encode_history(history: &[IntentRecord]) -> Result<Vec<u8>> {
    Ok(bincode::serialize(history)?)
}

pub fn decode_history(bytes: &[u8]) -> Result<Vec<IntentRecord>> {
    Ok(bincode::deserialize(bytes)?)
}

impl Match {
    /// Start a fresh match from the same inputs and apply every recorded
    /// intent in order. Any intent that is rejected on replay means the
    /// history does not belong to these inputs.
    pub fn replay(
        config: MatchConfig,
        registry: Arc<CardRegistry>,
        decks: PlayerMap<Vec<CardId>>,
        history: &[IntentRecord],
    ) -> Result<Self> {
        let mut game = Self::new(config, registry, decks)?;
        for record in history {
            game.apply(record.player, record.intent.clone()).map_err(|err| {
                EngineError::invariant(format!("replay diverged at intent {}: {}", record.sequence, err))
            })?;
        }
        debug!(intents = history.len(), turn = game.turn, "replay complete");
        Ok(game)
    }

    /// The history as bytes.
    pub fn encoded_history(&self) -> Result<Vec<u8>> {
        let records: Vec<IntentRecord> = self.history.iter().cloned().collect();
        encode_history(&records)
    }
}
