//! Turn correlation: folds an unordered batch of event records into an
//! ordered sequence of ReAct turns.
//!
//! `event_seq` is the single authoritative sort key; wall-clock timestamps
//! are never trusted for ordering. Turn numbers reflect first-occurrence
//! order of the grouping key, not key value. Re-running the fold over the
//! same (possibly grown) record set yields identical output, so callers
//! simply re-correlate on every new batch.

use std::collections::HashMap;

use serde::Serialize;

use lens_protocol::{EventKind, EventRecord, RunStatus};

use crate::extract::thought_text;

/// One reconstructed prompt → thought → action → observation round trip.
///
/// At most one record occupies each slot; replacement follows the precedence
/// rules in [`correlate`]. `records` keeps every record of the group in
/// `event_seq` order, including records no slot rule recognized.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    /// The grouping key (correlation id, or the founding record's id).
    pub id: String,
    /// 1-based, assigned in first-occurrence order.
    pub turn_number: u32,
    pub prompt: Option<EventRecord>,
    /// The request-started marker ("may be running").
    pub thought_sent: Option<EventRecord>,
    /// The resolved LLM response.
    pub thought: Option<EventRecord>,
    /// First tool invocation of the turn.
    pub action: Option<EventRecord>,
    /// Tool result.
    pub observation: Option<EventRecord>,
    pub records: Vec<EventRecord>,
}

impl Turn {
    fn new(id: String, turn_number: u32) -> Self {
        Self {
            id,
            turn_number,
            prompt: None,
            thought_sent: None,
            thought: None,
            action: None,
            observation: None,
            records: Vec::new(),
        }
    }

    /// Route one record into its slot.
    fn route(&mut self, record: EventRecord) {
        match record.kind {
            EventKind::PromptSent => self.prompt = Some(record),
            EventKind::TurnSent => self.thought_sent = Some(record),
            EventKind::TurnReceived => {
                // A resolved response replaces the thought only when it
                // carries content, so an empty placeholder can never clobber
                // a previously captured rich response.
                if !thought_text(&record).is_empty() || self.thought.is_none() {
                    self.thought = Some(record);
                }
            }
            EventKind::ChatReceivedFallback => {
                if self.thought.is_none() {
                    self.thought = Some(record);
                }
            }
            EventKind::ChatSentFallback => {
                if self.prompt.is_none() {
                    self.prompt = Some(record);
                }
            }
            EventKind::ToolCallExecuted => {
                if record.status == RunStatus::Running && self.action.is_none() {
                    self.action = Some(record);
                } else {
                    // Terminal record. Backfill the action when only the
                    // terminal record was ever observed (e.g. page reload).
                    if self.action.is_none() {
                        self.action = Some(record.clone());
                    }
                    self.observation = Some(record);
                }
            }
            EventKind::Other => {
                tracing::trace!(id = %record.id, "record kind not routed");
            }
        }
    }
}

/// Fold `records` into display-ready turns.
///
/// Records are sorted by `event_seq`, grouped by correlation id (falling back
/// to the record's own id), and routed into slots. Turns come back in
/// first-occurrence order and are never discarded once created. No record
/// causes the fold to fail: unroutable records still contribute to their
/// turn group.
pub fn correlate(records: &[EventRecord]) -> Vec<Turn> {
    let mut sorted: Vec<EventRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.event_seq);

    let mut turns: Vec<Turn> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in sorted {
        let key = record.group_key().to_string();
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                let i = turns.len();
                turns.push(Turn::new(key.clone(), (i + 1) as u32));
                index.insert(key, i);
                i
            }
        };
        let turn = &mut turns[slot];
        turn.records.push(record.clone());
        turn.route(record);
    }

    turns
}
