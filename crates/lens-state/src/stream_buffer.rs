use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lens_protocol::{RunStatus, StreamChunkParams};

pub const STREAM_CHUNK_CAP: usize = 2000; // most recent chunks kept per log

/// Buffered live-stream state for one log id.
#[derive(Debug, Clone)]
struct StreamBuffer {
    chunks: Vec<String>,
    /// Present while a viewer is watching. `append` is a no-op without it.
    subscribed_at: Option<DateTime<Utc>>,
    status: RunStatus,
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self { chunks: Vec::new(), subscribed_at: None, status: RunStatus::Running }
    }
}

/// Read-only view of one buffer for the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSnapshot {
    pub chunks: Vec<String>,
    pub status: RunStatus,
    pub subscribed: bool,
}

/// Ledger of live-streaming text output for logs a viewer has chosen to
/// watch.
///
/// Chunks emitted before the subscription instant are never buffered, even
/// if the transport delivers them — a viewer never sees history. Chunk order
/// within a buffer is receipt order; only the before/after-subscription
/// boundary is timestamp-checked. `unsubscribe` is the cancellation
/// primitive: it stops future appends synchronously, while buffered chunks
/// survive until `clear`.
#[derive(Debug, Default)]
pub struct StreamBufferStore {
    buffers: HashMap<String, StreamBuffer>,
}

impl StreamBufferStore {
    pub fn new() -> Self {
        Self { buffers: HashMap::new() }
    }

    /// Start watching `log_id` as of `now`.
    ///
    /// Idempotent: re-subscribing while already subscribed keeps the existing
    /// chunks and the original subscription instant. Subscribing again after
    /// an `unsubscribe` records a fresh instant. Callers restarting a view
    /// are expected to `clear` first.
    pub fn subscribe(&mut self, log_id: &str, now: DateTime<Utc>) {
        let buf = self.buffers.entry(log_id.to_string()).or_default();
        buf.subscribed_at.get_or_insert(now);
    }

    /// Stop watching `log_id`, effective immediately.
    /// Chunks and status remain until an explicit `clear`.
    pub fn unsubscribe(&mut self, log_id: &str) {
        if let Some(buf) = self.buffers.get_mut(log_id) {
            buf.subscribed_at = None;
        }
    }

    /// Reset `log_id` to an empty, `running` buffer — a fresh viewing session
    /// for a log the viewer may have seen before. Last writer wins when a
    /// re-subscribe races a clear.
    pub fn clear(&mut self, log_id: &str) {
        let buf = self.buffers.entry(log_id.to_string()).or_default();
        buf.chunks.clear();
        buf.status = RunStatus::Running;
    }

    /// Overwrite the last-known status, reconciling with externally polled
    /// state once the streamed unit of work reaches a terminal status.
    pub fn set_status(&mut self, log_id: &str, status: RunStatus) {
        if let Some(buf) = self.buffers.get_mut(log_id) {
            buf.status = status;
        }
    }

    /// Apply one inbound chunk message stamped with its envelope timestamp.
    ///
    /// Dropped without effect when the log has no active subscription
    /// (unwatched streams must not grow memory) or when `event_timestamp`
    /// predates the subscription instant (no replay of history). Otherwise
    /// the chunk is appended, the buffer trimmed to [`STREAM_CHUNK_CAP`],
    /// and the status updated: the payload status wins, `finished` alone
    /// implies `success`, and neither leaves the buffer `running`.
    pub fn append(&mut self, msg: &StreamChunkParams, event_timestamp: DateTime<Utc>) {
        let Some(buf) = self.buffers.get_mut(&msg.log_id) else {
            tracing::trace!(log_id = %msg.log_id, "chunk for unwatched log dropped");
            return;
        };
        let Some(subscribed_at) = buf.subscribed_at else {
            tracing::trace!(log_id = %msg.log_id, "chunk after unsubscribe dropped");
            return;
        };
        if event_timestamp < subscribed_at {
            tracing::trace!(log_id = %msg.log_id, "pre-subscription chunk dropped");
            return;
        }

        if !msg.chunk.is_empty() {
            buf.chunks.push(msg.chunk.clone());
            if buf.chunks.len() > STREAM_CHUNK_CAP {
                let excess = buf.chunks.len() - STREAM_CHUNK_CAP;
                buf.chunks.drain(..excess);
            }
        }

        if let Some(status) = msg.status {
            buf.status = status;
        } else if msg.finished {
            buf.status = RunStatus::Success;
        }
    }

    /// Snapshot of one buffer; `None` when the log id was never seen.
    pub fn snapshot(&self, log_id: &str) -> Option<StreamSnapshot> {
        self.buffers.get(log_id).map(|buf| StreamSnapshot {
            chunks: buf.chunks.clone(),
            status: buf.status,
            subscribed: buf.subscribed_at.is_some(),
        })
    }

    pub fn is_subscribed(&self, log_id: &str) -> bool {
        self.buffers
            .get(log_id)
            .map(|b| b.subscribed_at.is_some())
            .unwrap_or(false)
    }

    /// Number of tracked logs (for monitoring).
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
