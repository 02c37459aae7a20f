//! Shared connector state.

use std::collections::HashMap;

use lens_protocol::EventRecord;
use lens_state::{StageLogStore, StreamBufferStore};

/// Everything the HTTP and WebSocket handlers share, guarded by one
/// `tokio::sync::RwLock` in the service layer.
#[derive(Debug, Default)]
pub struct ConnectorState {
    /// Authoritative event records per task, keyed by record id.
    records: HashMap<String, HashMap<String, EventRecord>>,
    pub streams: StreamBufferStore,
    pub stage_logs: StageLogStore,
}

impl ConnectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly fetched record batch for `task_id`.
    ///
    /// Records are immutable, so a re-delivered id simply overwrites in
    /// place; correlation is re-derived on read. Returns the number of ids
    /// not seen before.
    pub fn merge_records(&mut self, task_id: &str, batch: Vec<EventRecord>) -> usize {
        let task = self.records.entry(task_id.to_string()).or_default();
        let mut fresh = 0;
        for record in batch {
            if task.insert(record.id.clone(), record).is_none() {
                fresh += 1;
            }
        }
        fresh
    }

    /// The record set for one task. Order is irrelevant; the correlator
    /// sorts by `event_seq`.
    pub fn task_records(&self, task_id: &str) -> Vec<EventRecord> {
        self.records
            .get(task_id)
            .map(|task| task.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Forget a task's records and stage buffers (view teardown).
    pub fn drop_task(&mut self, task_id: &str) {
        self.records.remove(task_id);
        self.stage_logs.clear_task(task_id);
    }
}
