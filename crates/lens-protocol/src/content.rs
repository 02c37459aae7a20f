//! Message-body decoding.
//!
//! Payload bodies arrive from the backend either as a plain string or as a
//! list of heterogeneous content blocks. Both shapes are decoded defensively:
//! anything unrecognized contributes no text instead of failing the record.

use serde::{Deserialize, Serialize};

/// Free-form textual body of a prompt or response record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Any other JSON shape. Flattens to nothing.
    Opaque(serde_json::Value),
}

/// One item of a block-list body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Text(String),
    Part {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Opaque(serde_json::Value),
}

impl ContentBlock {
    /// Display text for one block: a non-empty `text` field, then a non-empty
    /// `content` field, then a bare string.
    fn flatten(&self) -> Option<String> {
        match self {
            Self::Text(s) => non_empty(s),
            Self::Part { text, content } => text
                .as_deref()
                .and_then(non_empty)
                .or_else(|| content.as_deref().and_then(non_empty)),
            Self::Opaque(_) => None,
        }
    }
}

impl MessageBody {
    /// Extract display text.
    ///
    /// Plain text is trimmed and used as-is. Block lists flatten each block,
    /// filter empty results, and join with newlines. Malformed shapes degrade
    /// to an empty string.
    pub fn flatten(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(ContentBlock::flatten)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Opaque(_) => String::new(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
