//! Stack entries.

use serde::{Deserialize, Serialize};

use crate::core::{DeckDestination, EntityId, PlayerId};
use crate::effects::Effect;

/// Unique identifier for a stack entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackEntryId(pub u32);

impl StackEntryId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StackEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StackEntry({})", self.0)
    }
}

/// What put an entry on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackOrigin {
    Spell,
    Summon,
    Trigger,
    Ability,
}

/// A player's answer to a mid-resolution request, carried on the entry
/// until the suspended effect picks it up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionAnswer {
    Optional(bool),
    Amount(i32),
    Cards(Vec<EntityId>),
    Destinations(Vec<(EntityId, DeckDestination)>),
}

/// One resolution unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackObj {
    pub id: StackEntryId,
    pub source: EntityId,
    pub controller: PlayerId,
    pub origin: StackOrigin,
    /// Clones bound to `source`, with targets filled in.
    pub effects: Vec<Effect>,
    pub x: i32,
    /// Next effect to resolve. Survives suspension.
    pub resume_index: usize,
    pub answer: Option<ResolutionAnswer>,
    /// Card the originating trigger event was about.
    pub subject: Option<EntityId>,
}

/// The stack itself. Index 0 is the bottom.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stack {
    entries: Vec<StackObj>,
    next_id: u32,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for the next entry.
    pub fn next_id(&mut self) -> StackEntryId {
        let id = StackEntryId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, entry: StackObj) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<StackObj> {
        self.entries.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&StackObj> {
        self.entries.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackObj> {
        self.entries.last_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, StackObj> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[StackObj] {
        &self.entries
    }

    /// Remove the entry carrying `source`, wherever it sits.
    pub fn remove_source(&mut self, source: EntityId) -> Option<StackObj> {
        let index = self.entries.iter().position(|e| e.source == source)?;
        Some(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stack: &mut Stack, source: u32) -> StackObj {
        StackObj {
            id: stack.next_id(),
            source: EntityId(source),
            controller: PlayerId::new(0),
            origin: StackOrigin::Spell,
            effects: Vec::new(),
            x: 0,
            resume_index: 0,
            answer: None,
            subject: None,
        }
    }

    #[test]
    fn test_lifo() {
        let mut stack = Stack::new();
        let a = entry(&mut stack, 10);
        let b = entry(&mut stack, 11);
        stack.push(a);
        stack.push(b);

        assert_eq!(stack.pop().unwrap().source, EntityId(11));
        assert_eq!(stack.pop().unwrap().source, EntityId(10));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut stack = Stack::new();
        let a = stack.next_id();
        let b = stack.next_id();
        assert_ne!(a, b);
        assert_eq!(format!("{}", b), "StackEntry(1)");
    }

    #[test]
    fn test_remove_from_middle() {
        let mut stack = Stack::new();
        for source in 10..13 {
            let e = entry(&mut stack, source);
            stack.push(e);
        }
        let removed = stack.remove_source(EntityId(11)).unwrap();
        assert_eq!(removed.source, EntityId(11));
        let left: Vec<_> = stack.iter().map(|e| e.source).collect();
        assert_eq!(left, vec![EntityId(10), EntityId(12)]);
        assert!(stack.remove_source(EntityId(99)).is_none());
    }
}
