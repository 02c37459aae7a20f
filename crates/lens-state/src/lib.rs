//! TaskLens State - process-wide stores for live log viewing
//!
//! Two explicit state containers, partitioned by log/stage id so any number
//! of concurrent viewers can watch different logs without interference:
//! the stream buffer store (character chunks for in-progress turns) and the
//! stage log store (discrete records for the plain live-execution-log view).

pub mod stage_log;
pub mod stream_buffer;

pub use stage_log::{StageLogStore, STAGE_LOG_CAP};
pub use stream_buffer::{StreamBufferStore, StreamSnapshot, STREAM_CHUNK_CAP};
