use std::collections::{HashMap, VecDeque};

use lens_protocol::EventRecord;

pub const STAGE_LOG_CAP: usize = 200; // entries kept per stage

/// Bounded per-stage ring of discrete execution-step records, backing the
/// plain live-execution-log view outside the ReAct timeline.
#[derive(Debug, Default)]
pub struct StageLogStore {
    stages: HashMap<String, VecDeque<EventRecord>>,
}

impl StageLogStore {
    pub fn new() -> Self {
        Self { stages: HashMap::new() }
    }

    /// Append one record to a stage's ring. O(1) amortized; the oldest entry
    /// is evicted once the ring exceeds [`STAGE_LOG_CAP`].
    pub fn append(&mut self, stage_id: &str, record: EventRecord) {
        let ring = self.stages.entry(stage_id.to_string()).or_default();
        ring.push_back(record);
        if ring.len() > STAGE_LOG_CAP {
            ring.pop_front();
        }
    }

    /// Records buffered for `stage_id`, oldest first.
    pub fn records(&self, stage_id: &str) -> Vec<EventRecord> {
        self.stages
            .get(stage_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every stage buffer belonging to `task_id` (view teardown).
    /// A stage belongs to the task of its first buffered record.
    pub fn clear_task(&mut self, task_id: &str) {
        self.stages.retain(|_, ring| {
            ring.front().map(|r| r.task_id != task_id).unwrap_or(true)
        });
    }

    /// Number of stages with a live buffer (for monitoring).
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}
