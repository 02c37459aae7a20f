use thiserror::Error;

/// Errors surfaced while decoding wire payloads.
///
/// Note that record-level degradation (unknown kinds, malformed bodies) is
/// not an error: those decode to catch-all variants and flow through. Only
/// frames that are not valid JSON for any known shape end up here.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed live-channel message: {0}")]
    Envelope(#[from] serde_json::Error),
}
