use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{EventRecord, RunStatus};

/// Envelope for one inbound live-channel message.
///
/// The envelope timestamp is stamped by the transport at send time and is
/// compared against the viewer's subscription instant; it does not order
/// chunks within a log (receipt order does).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEnvelope {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: LivePayload,
}

impl LiveEnvelope {
    /// Decode one live-channel frame.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Payload variants carried by the live channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LivePayload {
    /// A streamed output chunk for a watched log.
    StreamChunk(StreamChunkParams),
    /// A discrete execution-step record for the plain live-log view.
    StageRecord(EventRecord),
}

/// One streamed output chunk. Sole input to the stream buffer store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunkParams {
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    /// Id of the turn-sent record this chunk supplements.
    pub log_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default)]
    pub chunk: String,
    /// Set on the last chunk of a stream. Implies `success` when no explicit
    /// status accompanies it.
    #[serde(default)]
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
}
