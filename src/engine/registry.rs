//! Concurrent map of running matches.
//!
//! Each match sits behind its own mutex. `with_match` is the only way in,
//! so every intent for one match is applied inside that match's critical
//! section while other matches proceed in parallel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;

use super::Match;
use crate::cards::{CardId, CardRegistry};
use crate::core::{MatchConfig, MatchId, PlayerMap};
use crate::error::{EngineError, Result};

/// All matches hosted by one process.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: DashMap<MatchId, Arc<Mutex<Match>>>,
    next_id: AtomicU64,
}

impl MatchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a match and register it.
    pub fn create(
        &self,
        config: MatchConfig,
        cards: Arc<CardRegistry>,
        decks: PlayerMap<Vec<CardId>>,
    ) -> Result<MatchId> {
        let game = Match::new(config, cards, decks)?;
        let id = MatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.matches.insert(id, Arc::new(Mutex::new(game)));
        info!(match_id = %id, "match registered");
        Ok(id)
    }

    /// Run `f` with exclusive access to one match.
    pub fn with_match<T>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> T) -> Result<T> {
        // Clone the handle so the shard lock is released before the match lock is taken.
        let handle = self
            .matches
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(EngineError::MatchNotFound(id))?;
        let mut game = handle.lock();
        Ok(f(&mut game))
    }

    /// Drop a match, returning it if nobody else holds it.
    pub fn remove(&self, id: MatchId) -> Option<Match> {
        let (_, handle) = self.matches.remove(&id)?;
        info!(match_id = %id, "match removed");
        Arc::try_unwrap(handle).ok().map(Mutex::into_inner)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
