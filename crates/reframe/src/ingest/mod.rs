use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::message::ChatMessage;
use crate::utils::content;

const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLoadResult {
    pub messages: Vec<ChatMessage>,
    pub warnings: Vec<String>,
}

/// Loads a transcript file, dispatching on extension: `.jsonl` is one
/// message object per line, anything else a JSON array of messages.
pub fn load_transcript(path: &Path) -> Result<TranscriptLoadResult> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or_default()
        .to_ascii_lowercase();

    if extension == "jsonl" {
        Ok(parse_transcript_jsonl(&input))
    } else {
        Ok(parse_transcript_json(&input))
    }
}

/// Parses a JSON array of message objects. Content issues become
/// warnings, never failures; a malformed document yields an empty
/// message list plus one warning.
#[must_use]
pub fn parse_transcript_json(input: &str) -> TranscriptLoadResult {
    let mut messages = Vec::new();
    let mut warnings = Vec::new();

    let parsed = match serde_json::from_str::<Value>(input) {
        Ok(value) => value,
        Err(error) => {
            warnings.push(format!("invalid JSON transcript ({error})"));
            return TranscriptLoadResult { messages, warnings };
        }
    };

    let Some(entries) = parsed.as_array() else {
        warnings.push("transcript root must be an array of messages".to_string());
        return TranscriptLoadResult { messages, warnings };
    };

    for (index, entry) in entries.iter().enumerate() {
        let locator = format!("entry {}", index + 1);
        if let Some(message) = message_from_value(entry, &locator, &mut warnings) {
            messages.push(message);
        }
    }

    TranscriptLoadResult { messages, warnings }
}

/// Parses one message object per line; invalid rows are skipped with
/// a warning.
#[must_use]
pub fn parse_transcript_jsonl(input: &str) -> TranscriptLoadResult {
    let mut messages = Vec::new();
    let mut warnings = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parsed = match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(error) => {
                warnings.push(format!("line {line_number}: invalid JSON payload ({error})"));
                continue;
            }
        };

        let locator = format!("line {line_number}");
        if let Some(message) = message_from_value(&parsed, &locator, &mut warnings) {
            messages.push(message);
        }
    }

    TranscriptLoadResult { messages, warnings }
}

/// Maps one loosely-shaped transcript row onto the plain message
/// shape. The body may be a bare string or a nested block structure;
/// a missing role defaults to `user`.
fn message_from_value(
    value: &Value,
    locator: &str,
    warnings: &mut Vec<String>,
) -> Option<ChatMessage> {
    let Some(object) = value.as_object() else {
        warnings.push(format!("{locator}: message must be a JSON object"));
        return None;
    };

    let role = object
        .get("role")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .unwrap_or_else(|| {
            warnings.push(format!("{locator}: missing `role`; defaulting to `user`"));
            DEFAULT_ROLE
        })
        .to_string();

    let Some(body) = object.get("content").and_then(content::message_text) else {
        warnings.push(format!("{locator}: missing or empty `content`; skipped"));
        return None;
    };

    Some(ChatMessage { role, content: body })
}
