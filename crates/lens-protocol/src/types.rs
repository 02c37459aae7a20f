use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::MessageBody;

/// Kind of interaction step an event record reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A prompt was dispatched to the model.
    PromptSent,
    /// A ReAct turn request started (the "may be running" marker).
    TurnSent,
    /// The resolved LLM response for a turn.
    TurnReceived,
    /// Request marker from transports without turn framing.
    ChatSentFallback,
    /// Response from transports without turn framing.
    ChatReceivedFallback,
    /// A tool invocation, in flight or finished depending on `status`.
    ToolCallExecuted,
    /// Any kind this build does not know. Such records still establish their
    /// turn group but are never routed to a slot.
    #[serde(other)]
    Other,
}

/// Lifecycle status of the unit of work a record reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    /// Dispatched, not yet acknowledged.
    Sent,
    /// Acknowledged and executing.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Failed,
    /// Stopped before completion.
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }
}

/// One immutable log entry describing a single step of agent/tool/LLM
/// interaction.
///
/// `event_seq` is the single authoritative sort key for a task's log;
/// `created_at` is informational and never used for ordering. Records are
/// created once by the backend and only read on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    /// Groups related records into one turn. Grouping falls back to `id`
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    /// Monotonically assigned arrival order within the task.
    pub event_seq: u64,
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    #[serde(default)]
    pub status: RunStatus,
    /// Prompt or response content, when the step carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<MessageBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_args: Option<serde_json::Value>,
    /// Tool output. The backend has emitted this under several names over
    /// time; all are accepted on decode.
    #[serde(
        default,
        alias = "output_summary",
        alias = "result",
        skip_serializing_if = "Option::is_none"
    )]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(task_id: &str, kind: EventKind, event_seq: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            correlation_id: None,
            task_id: task_id.to_string(),
            stage_id: None,
            event_seq,
            kind,
            status: RunStatus::default(),
            body: None,
            command: None,
            command_args: None,
            output: None,
            duration_ms: None,
            created_at: Utc::now(),
        }
    }

    /// The key this record groups under: `correlation_id`, else its own id.
    pub fn group_key(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or(&self.id)
    }
}
