use std::sync::OnceLock;

use regex::Regex;

use crate::models::assessment::ChallengeQuestionRecord;
use crate::models::form::{CANONICAL_SCHEMA_MODES, FormSchemaMode, ParsedCbtForm};
use crate::models::message::ChatMessage;
use crate::utils::date::normalize_date;
use crate::utils::scale::{SCALE_MAX, clamp_scale};

const SITUATION_HEADING: &str = "## Situation";
const INITIAL_EMOTIONS_HEADING: &str = "## Emotions at the Start";
const FINAL_EMOTIONS_HEADING: &str = "## Emotions at the End";
const AUTOMATIC_THOUGHTS_HEADING: &str = "## Automatic Thoughts";
const RATIONAL_THOUGHTS_HEADING: &str = "## Rational Thoughts";
const BEHAVIORAL_PATTERN_HEADING: &str = "## Behavioral Pattern";
const SCHEMA_MODES_HEADING: &str = "## Schema Modes";
const SCHEMA_REFLECTION_HEADING: &str = "### Schema Reflection";
const CHALLENGE_QUESTIONS_HEADING: &str = "## Challenge Questions";
const ADDITIONAL_QUESTIONS_HEADING: &str = "## Additional Questions";
const NEW_BEHAVIORS_HEADING: &str = "## New Behaviors";

/// Reconstructs a complete form from a diary export spread over a
/// message list. Diary exports normally arrive as a single message;
/// multiple messages are joined in order before parsing.
#[must_use]
pub fn parse_cbt_from_markdown(messages: &[ChatMessage]) -> ParsedCbtForm {
    let document = messages
        .iter()
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    parse_diary_document(&document)
}

/// Parses one diary document into the fully defaulted form shape.
///
/// Every section extractor defaults to empty/zero on miss and a
/// malformed fragment only lands in `parsing_errors`; a single broken
/// section never aborts extraction of the rest.
#[must_use]
pub fn parse_diary_document(document: &str) -> ParsedCbtForm {
    let mut form = ParsedCbtForm::seeded(CANONICAL_SCHEMA_MODES);

    extract_date(document, &mut form);

    if let Some(block) = heading_block(document, SITUATION_HEADING) {
        form.situation = block;
    }

    if let Some(block) = heading_block(document, INITIAL_EMOTIONS_HEADING) {
        parse_emotion_list(&block, "start", &mut form, true);
    }
    if let Some(block) = heading_block(document, FINAL_EMOTIONS_HEADING) {
        parse_emotion_list(&block, "end", &mut form, false);
    }

    if let Some(block) = heading_block(document, AUTOMATIC_THOUGHTS_HEADING) {
        form.automatic_thoughts = bullet_texts(&block);
    }
    if let Some(block) = heading_block(document, RATIONAL_THOUGHTS_HEADING) {
        form.rational_thoughts = bullet_texts(&block);
    }

    if let Some(captures) = credibility_regex().captures(document) {
        let rating = clamped_rating(&captures[1], "thought credibility", &mut form);
        form.thought_credibility = rating;
    }

    if let Some(block) = heading_block(document, BEHAVIORAL_PATTERN_HEADING) {
        form.core_belief = block;
    }

    if let Some(block) = heading_block(document, SCHEMA_MODES_HEADING) {
        parse_mode_checkboxes(&block, &mut form);
    }

    // The reflection block counts only when its own header marker is
    // present; prose elsewhere never qualifies.
    if let Some(block) = heading_block(document, SCHEMA_REFLECTION_HEADING) {
        form.schema_reflection = block;
    }

    if let Some(block) = heading_block(document, CHALLENGE_QUESTIONS_HEADING) {
        let rows = parse_question_table(&block, "challenge questions", &mut form);
        form.challenge_questions = rows;
    }
    if let Some(block) = heading_block(document, ADDITIONAL_QUESTIONS_HEADING) {
        let rows = parse_question_table(&block, "additional questions", &mut form);
        form.additional_questions = rows;
    }

    if let Some(block) = heading_block(document, NEW_BEHAVIORS_HEADING) {
        form.new_behaviors = block;
    }

    form.recompute_completeness();
    form
}

/// Block of lines following a heading, up to the next heading of any
/// level or the end of the document.
fn heading_block(document: &str, heading: &str) -> Option<String> {
    let mut block: Option<Vec<&str>> = None;
    for line in document.lines() {
        let trimmed = line.trim();
        match &mut block {
            None => {
                if trimmed.eq_ignore_ascii_case(heading) {
                    block = Some(Vec::new());
                }
            }
            Some(lines) => {
                if trimmed.starts_with('#') {
                    break;
                }
                lines.push(line);
            }
        }
    }

    block.map(|lines| lines.join("\n").trim().to_string())
}

fn date_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\*\*Date\*\*:\s*(.+)$").expect("diary date regex should compile")
    })
}

fn extract_date(document: &str, form: &mut ParsedCbtForm) {
    let Some(captures) = date_line_regex().captures(document) else {
        return;
    };

    let raw = captures[1].trim();
    match normalize_date(raw) {
        Some(normalized) => form.date = normalized,
        None => {
            form.date = raw.to_string();
            form.parsing_errors
                .push(format!("date `{raw}` not recognized; kept verbatim"));
        }
    }
}

fn emotion_item_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*[-•]\s*([^:\n]+?):\s*(\d{1,3})\s*/\s*10\s*$")
            .expect("diary emotion item regex should compile")
    })
}

fn parse_emotion_list(block: &str, label: &str, form: &mut ParsedCbtForm, initial: bool) {
    for captures in emotion_item_regex().captures_iter(block) {
        let name = captures[1].trim().to_string();
        let rating = clamped_rating(&captures[2], &format!("{name} ({label})"), form);
        let target = if initial {
            &mut form.initial_emotions
        } else {
            &mut form.final_emotions
        };
        target.set(&name, i64::from(rating));
    }
}

fn bullet_item_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*[-•]\s*["“]?(.+?)["”]?\s*$"#)
            .expect("diary bullet item regex should compile")
    })
}

fn bullet_texts(block: &str) -> Vec<String> {
    bullet_item_regex()
        .captures_iter(block)
        .map(|captures| captures[1].trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

fn credibility_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?mi)^credibility of the original thought:\s*(\d{1,3})\s*/\s*10\s*$")
            .expect("diary credibility regex should compile")
    })
}

fn mode_checkbox_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*[-•]\s*\[([ xX])\]\s*([^(\n]+?)\s*(?:\((\d{1,3})\s*/\s*10\))?\s*$")
            .expect("diary checkbox regex should compile")
    })
}

fn parse_mode_checkboxes(block: &str, form: &mut ParsedCbtForm) {
    for captures in mode_checkbox_regex().captures_iter(block) {
        let selected = !captures[1].trim().is_empty();
        let name = captures[2].trim().to_string();
        let intensity = captures
            .get(3)
            .map_or(0, |m| clamped_rating(m.as_str(), &name, form));

        let seeded = form
            .schema_modes
            .iter()
            .position(|mode| mode.name.eq_ignore_ascii_case(&name));
        match seeded {
            Some(index) => {
                let mode = &mut form.schema_modes[index];
                mode.selected = selected;
                mode.intensity = intensity;
            }
            None => form.schema_modes.push(FormSchemaMode {
                name,
                selected,
                intensity,
            }),
        }
    }
}

fn parse_question_table(
    block: &str,
    table_label: &str,
    form: &mut ParsedCbtForm,
) -> Vec<ChallengeQuestionRecord> {
    let mut rows = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('|') {
            continue;
        }

        let cells: Vec<&str> = trimmed
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();

        if is_separator_row(&cells) || is_header_row(&cells) {
            continue;
        }

        if cells.len() < 2 || cells[0].is_empty() {
            form.parsing_errors
                .push(format!("malformed {table_label} row skipped: `{trimmed}`"));
            continue;
        }

        rows.push(ChallengeQuestionRecord {
            question: cells[0].to_string(),
            answer: cells[1].to_string(),
        });
    }
    rows
}

fn is_separator_row(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            !cell.is_empty() && cell.chars().all(|ch| matches!(ch, '-' | ':' | ' '))
        })
}

fn is_header_row(cells: &[&str]) -> bool {
    cells
        .first()
        .is_some_and(|cell| cell.eq_ignore_ascii_case("question"))
}

fn clamped_rating(digits: &str, what: &str, form: &mut ParsedCbtForm) -> u8 {
    let value = digits.trim().parse::<i64>().unwrap_or(0);
    if value > i64::from(SCALE_MAX) {
        form.parsing_errors
            .push(format!("{what} rating {value} out of range; clamped to {SCALE_MAX}"));
    }
    clamp_scale(value)
}
