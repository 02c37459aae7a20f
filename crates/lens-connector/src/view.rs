//! Display-ready timeline views for the dashboard.

use serde::Serialize;

use lens_protocol::RunStatus;
use lens_state::StreamBufferStore;
use lens_timeline::{scope_thought, thought_text, Turn};

/// One display item in a turn's prompt → thought → tool-call → observation
/// sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimelineItem {
    Prompt {
        text: String,
    },
    Thought {
        text: String,
        /// True while the text comes from the live buffer of a turn whose
        /// terminal response has not yet arrived.
        streaming: bool,
    },
    ToolCall {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        args: Option<serde_json::Value>,
        status: RunStatus,
    },
    Observation {
        output: String,
        status: RunStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
}

/// One rendered turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub id: String,
    pub turn_number: u32,
    pub items: Vec<TimelineItem>,
}

/// Render correlated turns, merging live buffer content for turns whose
/// terminal response has not yet arrived. Once a resolved response record is
/// present, buffer content is ignored for that turn: the REST record
/// supersedes ephemeral stream content.
pub fn render_turns(turns: &[Turn], streams: &StreamBufferStore) -> Vec<TurnView> {
    turns.iter().map(|turn| render_turn(turn, streams)).collect()
}

fn render_turn(turn: &Turn, streams: &StreamBufferStore) -> TurnView {
    let mut items = Vec::new();

    if let Some(prompt) = &turn.prompt {
        let text = prompt.body.as_ref().map(|b| b.flatten()).unwrap_or_default();
        items.push(TimelineItem::Prompt { text });
    }

    match &turn.thought {
        Some(thought) => {
            let text = thought_text(thought);
            if !text.is_empty() {
                items.push(TimelineItem::Thought { text, streaming: false });
            }
        }
        None => {
            // The stream buffer is keyed by the turn-sent record's id.
            if let Some(sent) = &turn.thought_sent {
                if let Some(snapshot) = streams.snapshot(&sent.id) {
                    let text = scope_thought(&snapshot.chunks.concat());
                    if !text.is_empty() {
                        items.push(TimelineItem::Thought {
                            text,
                            streaming: !snapshot.status.is_terminal(),
                        });
                    }
                }
            }
        }
    }

    if let Some(action) = &turn.action {
        items.push(TimelineItem::ToolCall {
            command: action.command.clone().unwrap_or_default(),
            args: action.command_args.clone(),
            status: action.status,
        });
    }

    if let Some(observation) = &turn.observation {
        items.push(TimelineItem::Observation {
            output: observation.output.clone().unwrap_or_default(),
            status: observation.status,
            duration_ms: observation.duration_ms,
        });
    }

    TurnView { id: turn.id.clone(), turn_number: turn.turn_number, items }
}
