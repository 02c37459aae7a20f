//! TaskLens Timeline - ReAct turn reconstruction
//!
//! Folds unordered batches of event records into ordered conversational
//! turns (prompt → thought → action → observation). The fold is pure and
//! deterministic; callers re-run it whenever the record set changes.

pub mod correlate;
pub mod extract;

pub use correlate::{correlate, Turn};
pub use extract::{scope_thought, thought_text, THOUGHT_CLOSE, THOUGHT_OPEN};
