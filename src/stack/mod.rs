//! Stack and priority.
//!
//! Casts, activations and triggers become `StackObj` entries. Entries
//! resolve strictly last-in first-out, each one only after both players
//! pass priority in a row. The resolution itself lives in
//! `engine::resolution`; this module holds the data.

mod entry;
mod priority;

pub use entry::{ResolutionAnswer, Stack, StackEntryId, StackObj, StackOrigin};
pub use priority::PriorityTracker;
