use serde_json::Value;

// Keys that commonly carry the conversational body in exported
// transcript rows, probed in order before any recursive fallback.
const MESSAGE_TEXT_KEYS: &[&str] = &["content", "text", "message", "body", "parts"];

// Keys that never carry conversational content and would only pollute
// the recursive fallback (identifiers, routing metadata, timestamps).
const METADATA_KEYS: &[&str] = &[
    "id",
    "role",
    "type",
    "name",
    "model",
    "timestamp",
    "created_at",
    "session_id",
    "index",
];

pub const PREVIEW_MAX_CHARS: usize = 160;

/// Flattens a loosely-shaped transcript value into plain message text.
///
/// Chat exports wrap the body in different shapes depending on the
/// producer: a bare string, an array of content blocks, or an object
/// keyed by one of several conventional names. Strings are trimmed;
/// array fragments join with newlines; objects probe the conventional
/// keys first and fall back to a deterministic key-ordered sweep that
/// skips metadata.
#[must_use]
pub fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Array(items) => {
            let fragments: Vec<String> = items.iter().filter_map(message_text).collect();
            (!fragments.is_empty()).then(|| fragments.join("\n"))
        }
        Value::Object(map) => {
            for key in MESSAGE_TEXT_KEYS {
                if let Some(nested) = map.get(*key)
                    && let Some(text) = message_text(nested)
                {
                    return Some(text);
                }
            }

            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();

            let fragments: Vec<String> = keys
                .into_iter()
                .filter(|key| !MESSAGE_TEXT_KEYS.contains(key) && !METADATA_KEYS.contains(key))
                .filter_map(|key| map.get(key))
                .filter_map(message_text)
                .collect();
            (!fragments.is_empty()).then(|| fragments.join("\n"))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

/// Single-line preview of message text for inspect output.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut clipped: String = collapsed.chars().take(max_chars).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{message_text, preview};

    #[test]
    fn extracts_plain_strings_trimmed() {
        assert_eq!(
            message_text(&json!("  hello there  ")).as_deref(),
            Some("hello there")
        );
        assert_eq!(message_text(&json!("   ")), None);
    }

    #[test]
    fn joins_content_block_arrays() {
        let value = json!([{"type": "text", "text": "first"}, {"type": "text", "text": "second"}]);
        assert_eq!(message_text(&value).as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn probes_conventional_keys_before_fallback() {
        let value = json!({"note": "fallback", "content": "primary"});
        assert_eq!(message_text(&value).as_deref(), Some("primary"));
    }

    #[test]
    fn fallback_skips_metadata_keys() {
        let value = json!({"id": "m-1", "role": "user", "summary": "kept"});
        assert_eq!(message_text(&value).as_deref(), Some("kept"));
    }

    #[test]
    fn previews_collapse_whitespace_and_clip() {
        assert_eq!(preview("a  b\nc", 20), "a b c");
        let long = "x".repeat(50);
        let clipped = preview(&long, 10);
        assert!(clipped.starts_with("xxxxxxxxxx"));
        assert!(clipped.ends_with("..."));
    }
}
