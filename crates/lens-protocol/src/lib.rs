//! TaskLens Protocol - Event records and live-channel message definitions
//!
//! Defines the wire types shared between the orchestrator backend, the
//! TaskLens sidecar, and the browser dashboard: immutable event records
//! describing agent/tool/LLM interaction steps, and the envelope format
//! for live-streamed output chunks.

pub mod content;
pub mod error;
pub mod messages;
pub mod types;

pub use content::{ContentBlock, MessageBody};
pub use error::ProtocolError;
pub use messages::{LiveEnvelope, LivePayload, StreamChunkParams};
pub use types::{EventKind, EventRecord, RunStatus};
