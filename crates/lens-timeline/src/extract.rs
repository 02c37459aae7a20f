//! Thought-content extraction.

use lens_protocol::EventRecord;

pub const THOUGHT_OPEN: &str = "<thought>";
pub const THOUGHT_CLOSE: &str = "</thought>";

/// Display text for a response record's thought content.
///
/// Flattens the record body, then scopes to the first thought-tag match.
/// A record without a body, or with a body that flattens to nothing,
/// yields an empty string.
pub fn thought_text(record: &EventRecord) -> String {
    match &record.body {
        Some(body) => scope_thought(&body.flatten()),
        None => String::new(),
    }
}

/// Restrict `text` to the first `<thought> ... </thought>` match, if any.
///
/// The closing tag is optional: mid-stream output may only have the open tag,
/// which scopes the content to end-of-text. First match wins; a later literal
/// open tag inside already-scoped content is not interpreted.
pub fn scope_thought(text: &str) -> String {
    let Some(open) = text.find(THOUGHT_OPEN) else {
        return text.trim().to_string();
    };
    let rest = &text[open + THOUGHT_OPEN.len()..];
    let scoped = match rest.find(THOUGHT_CLOSE) {
        Some(close) => &rest[..close],
        None => rest,
    };
    scoped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_text_passes_through() {
        assert_eq!(scope_thought("  plain reasoning  "), "plain reasoning");
    }

    #[test]
    fn test_tag_pair_scopes_content() {
        assert_eq!(scope_thought("<thought>thinking</thought>done"), "thinking");
    }

    #[test]
    fn test_open_tag_alone_scopes_to_end() {
        assert_eq!(scope_thought("preamble<thought>still going"), "still going");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            scope_thought("<thought>one</thought><thought>two</thought>"),
            "one"
        );
    }

    #[test]
    fn test_literal_open_tag_inside_scope_is_kept() {
        // An unclosed first match swallows any later open tag verbatim.
        assert_eq!(
            scope_thought("<thought>outer <thought>inner"),
            "outer <thought>inner"
        );
    }
}
