use std::sync::OnceLock;

use regex::Regex;

use crate::models::form::CANONICAL_SCHEMA_MODES;
use crate::models::tier::SchemaReflectionDepth;

/// Structural CBT cues computed over the full user text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSignals {
    pub cbt_signature: f32,
    pub schema_reflection_present: bool,
    pub self_assessment_present: bool,
    pub reflection_depth: SchemaReflectionDepth,
}

/// Contextual validation of free text without structural cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSignals {
    pub therapeutic_relevance: u8,
    pub emotional_intensity: u8,
    pub stress_indicators: usize,
    pub neutral_context: bool,
    pub organizational_context: bool,
    pub exclusion_reason: Option<&'static str>,
    pub brief_request: bool,
}

impl ContextSignals {
    #[must_use]
    pub const fn is_valid_therapeutic_context(&self) -> bool {
        self.exclusion_reason.is_none() && self.therapeutic_relevance >= 3
    }
}

const THERAPEUTIC_KEYWORDS: &[&str] = &[
    "feel",
    "feeling",
    "felt",
    "emotion",
    "emotions",
    "anxious",
    "anxiety",
    "afraid",
    "fear",
    "angry",
    "anger",
    "sad",
    "sadness",
    "ashamed",
    "shame",
    "guilt",
    "guilty",
    "therapy",
    "therapist",
    "worry",
    "worried",
    "overwhelmed",
    "stress",
    "stressed",
    "lonely",
    "hopeless",
    "panic",
    "relationship",
    "conflict",
    "belief",
];

const STRONG_EMOTION_TERMS: &[&str] = &[
    "overwhelmed",
    "unbearable",
    "terrified",
    "panic",
    "devastated",
    "hopeless",
    "desperate",
    "furious",
    "worthless",
    "exhausted",
    "breaking down",
    "can't cope",
    "can't take",
];

const INTENSIFIER_TERMS: &[&str] = &[
    "extremely",
    "completely",
    "totally",
    "absolutely",
    "really",
    "so much",
    "all the time",
];

const STRESS_INDICATOR_TERMS: &[&str] = &[
    "can't sleep",
    "cannot sleep",
    "no energy",
    "heart racing",
    "panic attack",
    "crying",
    "can't concentrate",
    "no appetite",
    "nightmares",
    "on edge",
    "burned out",
    "burnout",
    "tense",
];

const ORGANIZATIONAL_TERMS: &[&str] = &[
    "appointment",
    "reschedule",
    "schedule",
    "invoice",
    "bill",
    "subscription",
    "cancel",
    "receipt",
    "export",
    "password",
    "login",
];

const GREETING_TERMS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good evening",
    "thanks",
    "thank you",
    "how are you",
];

const TECHNICAL_TERMS: &[&str] = &["password", "login", "bug", "crash", "error", "install"];

const BRIEF_REQUEST_MAX_CHARS: usize = 120;

fn rating_mention_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b(\d{1,2})\s*(?:/\s*10|out of 10)\b")
            .expect("rating mention regex should compile")
    })
}

fn emotion_rating_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b(?:fear|anger|sadness|joy|anxiety|shame|guilt)\b[^\n]{0,40}?\b\d{1,2}\s*/\s*10\b")
            .expect("emotion rating regex should compile")
    })
}

fn quoted_numbered_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*\d+\.\s*["“].+["”]"#)
            .expect("quoted numbered line regex should compile")
    })
}

#[must_use]
pub fn content_signals(text: &str) -> ContentSignals {
    let lowered = text.to_lowercase();

    let mut signature = 0.0_f32;
    if lowered.contains("cbt_summary_card") || lowered.contains("**cbt session") {
        signature += 0.4;
    }
    if emotion_rating_regex().is_match(&lowered) {
        signature += 0.3;
    }
    if lowered.contains("automatic thought") || quoted_numbered_line_regex().is_match(text) {
        signature += 0.3;
    }

    let self_assessment_present = rating_mention_regex()
        .captures_iter(&lowered)
        .any(|captures| captures[1].parse::<u8>().is_ok_and(|value| value <= 10));

    let mode_mentions = CANONICAL_SCHEMA_MODES
        .iter()
        .filter(|mode| lowered.contains(&mode.to_lowercase()))
        .count();
    let reflection_block = reflection_block(&lowered);
    let reflection_chars = reflection_block.map_or(0, str::len);
    let marker_present = reflection_block.is_some();

    let reflection_depth = if mode_mentions == 0 && reflection_chars == 0 {
        SchemaReflectionDepth::None
    } else if reflection_chars >= 400 || mode_mentions >= 3 {
        SchemaReflectionDepth::Comprehensive
    } else if reflection_chars >= 150 || mode_mentions == 2 {
        SchemaReflectionDepth::Moderate
    } else {
        SchemaReflectionDepth::Minimal
    };

    ContentSignals {
        cbt_signature: signature,
        schema_reflection_present: marker_present || mode_mentions >= 2,
        self_assessment_present,
        reflection_depth,
    }
}

/// Text following the schema-reflection marker, up to the next heading
/// or bold label line. Prose elsewhere never counts as reflection.
fn reflection_block(lowered: &str) -> Option<&str> {
    let start = lowered.find("schema reflection")? + "schema reflection".len();
    let rest = &lowered[start..];

    let mut consumed = 0;
    for line in rest.split_inclusive('\n') {
        if consumed > 0 {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.starts_with("**") {
                break;
            }
        }
        consumed += line.len();
    }
    Some(rest[..consumed].trim())
}

#[must_use]
pub fn context_signals(text: &str) -> ContextSignals {
    let lowered = text.to_lowercase();

    let relevance_hits = count_terms(&lowered, THERAPEUTIC_KEYWORDS);
    let therapeutic_relevance = (relevance_hits * 2).min(10) as u8;

    let strong_hits = count_terms(&lowered, STRONG_EMOTION_TERMS);
    let intensifier_hits = count_terms(&lowered, INTENSIFIER_TERMS);
    let exclamations = lowered.matches('!').count();
    let shouted_words = text
        .split_whitespace()
        .filter(|word| word.len() >= 4 && word.chars().all(|ch| ch.is_ascii_uppercase()))
        .count();
    let emotional_intensity = (strong_hits * 3
        + intensifier_hits
        + usize::from(exclamations >= 2)
        + usize::from(shouted_words >= 1))
    .min(10) as u8;

    let stress_indicators = count_terms(&lowered, STRESS_INDICATOR_TERMS);
    let neutral_context = count_terms(&lowered, GREETING_TERMS) > 0;
    let organizational_context = count_terms(&lowered, ORGANIZATIONAL_TERMS) > 0;

    let word_count = lowered.split_whitespace().count();
    let exclusion_reason = if neutral_context && word_count <= 6 && relevance_hits == 0 {
        Some("greeting_only")
    } else if organizational_context && therapeutic_relevance <= 2 {
        Some("organizational_request")
    } else if count_terms(&lowered, TECHNICAL_TERMS) > 0 && therapeutic_relevance <= 2 {
        Some("technical_question")
    } else {
        None
    };

    let trimmed = text.trim();
    let brief_request = trimmed.chars().count() <= BRIEF_REQUEST_MAX_CHARS
        && (trimmed.ends_with('?') || neutral_context || organizational_context);

    ContextSignals {
        therapeutic_relevance,
        emotional_intensity,
        stress_indicators,
        neutral_context,
        organizational_context,
        exclusion_reason,
        brief_request,
    }
}

/// Distinct term hits; single words match on word boundaries, phrases
/// by substring.
fn count_terms(lowered: &str, terms: &[&str]) -> usize {
    terms
        .iter()
        .filter(|term| contains_term(lowered, term))
        .count()
}

fn contains_term(lowered: &str, term: &str) -> bool {
    if term.contains(' ') {
        return lowered.contains(term);
    }

    lowered
        .split(|ch: char| !ch.is_alphanumeric() && ch != '\'')
        .any(|word| word == term)
}
