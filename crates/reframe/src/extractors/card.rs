use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::assessment::{
    ActionPlanRecord, CbtAssessment, CoreBeliefRecord, EmotionPair, EmotionSet,
    RationalThoughtRecord, SchemaModeRecord, SituationRecord, ThoughtRecord,
};
use crate::utils::date::UNKNOWN_DATE;
use crate::utils::scale::coerce_scale;

/// Marker of the compact wire format, embedded verbatim in one chat
/// message as `<!-- CBT_SUMMARY_CARD:<json> -->`.
pub const CARD_MARKER: &str = "CBT_SUMMARY_CARD";

const DEFAULT_DESCRIPTION: &str = "No description";
const DEFAULT_BELIEF: &str = "No belief";

fn summary_card_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)<!--\s*CBT_SUMMARY_CARD:\s*(.*?)\s*-->")
            .expect("summary card regex should compile")
    })
}

/// Cheap existence probe, no JSON parsing.
#[must_use]
pub fn contains_summary_card(text: &str) -> bool {
    text.contains(CARD_MARKER)
}

/// Parses the summary-card payload out of one message body.
///
/// Returns `None` for missing markers, malformed JSON, and non-object
/// payloads alike; the caller falls back to markdown parsing. Fields
/// with an unexpected shape are omitted, never fabricated.
#[must_use]
pub fn extract_summary_card(text: &str) -> Option<CbtAssessment> {
    let payload = summary_card_regex()
        .captures(text)
        .and_then(|captures| captures.get(1))?
        .as_str();

    let parsed: Value = serde_json::from_str(payload).ok()?;
    let card = parsed.as_object()?;

    Some(CbtAssessment {
        situation: map_situation(card),
        emotions: map_emotions(card),
        thoughts: map_thoughts(card, "automaticThoughts"),
        core_belief: map_core_belief(card),
        rational_thoughts: map_rational_thoughts(card),
        schema_modes: map_schema_modes(card),
        action_plan: map_action_plan(card),
        challenge_questions: None,
        emotion_comparison: None,
    })
}

fn map_situation(card: &Map<String, Value>) -> Option<SituationRecord> {
    let description = card.get("situation")?.as_str()?;
    let date = card
        .get("date")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_DATE);

    Some(SituationRecord {
        date: date.to_string(),
        description: if description.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            description.trim().to_string()
        },
    })
}

fn map_emotions(card: &Map<String, Value>) -> Option<EmotionPair> {
    let initial = emotion_set_from(card.get("initialEmotions")?)?;

    // Final ratings only attach alongside an initial set.
    let r#final = card.get("finalEmotions").and_then(emotion_set_from);

    Some(EmotionPair { initial, r#final })
}

fn emotion_set_from(value: &Value) -> Option<EmotionSet> {
    let entries = value.as_array()?;
    let mut set = EmotionSet::default();
    for entry in entries {
        let Some(object) = entry.as_object() else {
            continue;
        };
        let Some(label) = object.get("emotion").and_then(Value::as_str) else {
            continue;
        };
        let rating = object.get("rating").map_or(0, coerce_scale);
        set.set(label, i64::from(rating));
    }
    Some(set)
}

fn map_thoughts(card: &Map<String, Value>, key: &str) -> Option<Vec<ThoughtRecord>> {
    let thoughts = string_items(card.get(key)?, "thought");
    (!thoughts.is_empty()).then(|| {
        thoughts
            .into_iter()
            .map(|thought| ThoughtRecord {
                thought,
                credibility: 0,
            })
            .collect()
    })
}

fn map_rational_thoughts(card: &Map<String, Value>) -> Option<Vec<RationalThoughtRecord>> {
    let thoughts = string_items(card.get("rationalThoughts")?, "thought");
    (!thoughts.is_empty()).then(|| {
        thoughts
            .into_iter()
            .map(|thought| RationalThoughtRecord {
                thought,
                confidence: 0,
            })
            .collect()
    })
}

fn map_core_belief(card: &Map<String, Value>) -> Option<CoreBeliefRecord> {
    let belief = card.get("coreBelief")?.as_object()?;
    let text = belief
        .get("belief")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BELIEF);

    Some(CoreBeliefRecord {
        belief: text.to_string(),
        credibility: belief.get("credibility").map_or(0, coerce_scale),
    })
}

fn map_schema_modes(card: &Map<String, Value>) -> Option<Vec<SchemaModeRecord>> {
    let entries = card.get("schemaModes")?.as_array()?;
    let modes: Vec<SchemaModeRecord> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.trim();
            if name.is_empty() {
                return None;
            }
            let description = entry
                .get("description")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(name);

            Some(SchemaModeRecord {
                name: name.to_string(),
                intensity: entry.get("intensity").map_or(0, coerce_scale),
                description: description.to_string(),
            })
        })
        .collect();

    (!modes.is_empty()).then_some(modes)
}

fn map_action_plan(card: &Map<String, Value>) -> Option<ActionPlanRecord> {
    let new_behaviors = card
        .get("newBehaviors")
        .map(|value| string_items(value, "behavior"))
        .unwrap_or_default();
    let alternative_responses = card
        .get("alternativeResponses")
        .map(|value| string_items(value, "response"))
        .filter(|items| !items.is_empty());

    if new_behaviors.is_empty() && alternative_responses.is_none() {
        return None;
    }

    Some(ActionPlanRecord {
        new_behaviors,
        alternative_responses,
    })
}

/// Collects the string content of a wire array whose elements are
/// either plain strings or objects carrying the text under `key`.
fn string_items(value: &Value, key: &str) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.trim()),
            Value::Object(object) => object.get(key).and_then(Value::as_str).map(str::trim),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .collect()
}
