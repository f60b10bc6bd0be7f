use std::sync::OnceLock;

use regex::Regex;

use crate::models::assessment::{
    ActionPlanRecord, ChallengeQuestionRecord, CoreBeliefRecord, EmotionComparisonEntry,
    EmotionSet, RationalThoughtRecord, SchemaModeRecord, SituationRecord, ThoughtRecord,
};
use crate::utils::date::UNKNOWN_DATE;

/// Every legacy section header starts with this prefix; the full
/// header is the sole dispatch key.
pub const SECTION_HEADER_PREFIX: &str = "**CBT Session - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Situation,
    Emotions,
    Thoughts,
    CoreBelief,
    ChallengeQuestions,
    RationalThoughts,
    SchemaModes,
    ActionPlan,
    EmotionComparison,
}

impl SectionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Situation => "situation",
            Self::Emotions => "emotions",
            Self::Thoughts => "thoughts",
            Self::CoreBelief => "core_belief",
            Self::ChallengeQuestions => "challenge_questions",
            Self::RationalThoughts => "rational_thoughts",
            Self::SchemaModes => "schema_modes",
            Self::ActionPlan => "action_plan",
            Self::EmotionComparison => "emotion_comparison",
        }
    }
}

/// Payload of one successfully extracted section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionData {
    Situation(SituationRecord),
    Emotions(EmotionSet),
    Thoughts(Vec<ThoughtRecord>),
    CoreBelief(CoreBeliefRecord),
    ChallengeQuestions(Vec<ChallengeQuestionRecord>),
    RationalThoughts(Vec<RationalThoughtRecord>),
    SchemaModes(Vec<SchemaModeRecord>),
    ActionPlan(ActionPlanRecord),
    EmotionComparison(Vec<EmotionComparisonEntry>),
}

/// One entry of the section grammar: a header dispatch key plus the
/// body extractor for that section's line syntax.
pub struct SectionRule {
    pub kind: SectionKind,
    pub header: &'static str,
    extract: fn(&str) -> Option<SectionData>,
}

#[must_use]
pub fn section_rule_catalog() -> &'static [SectionRule] {
    &[
        SectionRule {
            kind: SectionKind::Situation,
            header: "**CBT Session - Situation Analysis**",
            extract: situation_section,
        },
        SectionRule {
            kind: SectionKind::Emotions,
            header: "**CBT Session - Emotion Assessment**",
            extract: emotions_section,
        },
        SectionRule {
            kind: SectionKind::Thoughts,
            header: "**CBT Session - Automatic Thoughts**",
            extract: thoughts_section,
        },
        SectionRule {
            kind: SectionKind::CoreBelief,
            header: "**CBT Session - Core Belief**",
            extract: core_belief_section,
        },
        SectionRule {
            kind: SectionKind::ChallengeQuestions,
            header: "**CBT Session - Challenge Questions**",
            extract: challenge_questions_section,
        },
        SectionRule {
            kind: SectionKind::RationalThoughts,
            header: "**CBT Session - Rational Thoughts**",
            extract: rational_thoughts_section,
        },
        SectionRule {
            kind: SectionKind::SchemaModes,
            header: "**CBT Session - Schema Modes**",
            extract: schema_modes_section,
        },
        SectionRule {
            kind: SectionKind::ActionPlan,
            header: "**CBT Session - Action Plan**",
            extract: action_plan_section,
        },
        SectionRule {
            kind: SectionKind::EmotionComparison,
            header: "**CBT Session - Emotion Comparison**",
            extract: emotion_comparison_section,
        },
    ]
}

/// Runs one grammar rule against a message body.
///
/// `None` means the header is absent from this message — callers must
/// not read that as "the user provided empty data".
#[must_use]
pub fn extract_section(message: &str, rule: &SectionRule) -> Option<SectionData> {
    let body = section_body(message, rule.header)?;
    (rule.extract)(body)
}

/// Slices the section body: everything after the header up to the next
/// `##`-level header, a `---` divider, or the end of the message.
/// Surrounding prose in the same message is tolerated.
fn section_body<'a>(message: &'a str, header: &str) -> Option<&'a str> {
    let start = message.find(header)? + header.len();
    let rest = &message[start..];

    let mut consumed = 0;
    for line in rest.split_inclusive('\n') {
        // The first fragment is the remainder of the header line.
        if consumed > 0 {
            let trimmed = line.trim();
            if trimmed.starts_with("##") || trimmed == "---" {
                return Some(&rest[..consumed]);
            }
        }
        consumed += line.len();
    }

    Some(rest)
}

fn date_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:📅|[•\-*])?\s*\*\*Date\*\*:\s*(.+)$")
            .expect("date line regex should compile")
    })
}

fn description_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:📝|[•\-*])?\s*\*\*Description\*\*:\s*(.+)$")
            .expect("description line regex should compile")
    })
}

fn situation_section(body: &str) -> Option<SectionData> {
    let description = description_line_regex()
        .captures(body)
        .map(|captures| captures[1].trim().to_string())
        .filter(|text| !text.is_empty())?;
    let date = date_line_regex()
        .captures(body)
        .map_or_else(|| UNKNOWN_DATE.to_string(), |captures| captures[1].trim().to_string());

    Some(SectionData::Situation(SituationRecord { date, description }))
}

fn emotion_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*[•\-*]\s*\*\*([^*]+)\*\*:\s*(\d{1,2})\s*/\s*10\b")
            .expect("emotion line regex should compile")
    })
}

fn emotions_section(body: &str) -> Option<SectionData> {
    let mut set = EmotionSet::default();
    let mut matched = false;
    for captures in emotion_line_regex().captures_iter(body) {
        let rating = captures[2].parse::<i64>().unwrap_or(0);
        set.set(&captures[1], rating);
        matched = true;
    }

    matched.then_some(SectionData::Emotions(set))
}

fn thought_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*\d+\.\s*["“]([^"“”]+)["”]\s*(?:\(Credibility:\s*(\d{1,2})\s*/\s*10\))?"#)
            .expect("thought line regex should compile")
    })
}

fn thoughts_section(body: &str) -> Option<SectionData> {
    let thoughts: Vec<ThoughtRecord> = thought_line_regex()
        .captures_iter(body)
        .map(|captures| ThoughtRecord {
            thought: captures[1].trim().to_string(),
            credibility: rating_capture(captures.get(2).map(|m| m.as_str())),
        })
        .collect();

    (!thoughts.is_empty()).then_some(SectionData::Thoughts(thoughts))
}

fn rational_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*\d+\.\s*["“]([^"“”]+)["”]\s*(?:\(Confidence:\s*(\d{1,2})\s*/\s*10\))?"#)
            .expect("rational thought line regex should compile")
    })
}

fn rational_thoughts_section(body: &str) -> Option<SectionData> {
    let thoughts: Vec<RationalThoughtRecord> = rational_line_regex()
        .captures_iter(body)
        .map(|captures| RationalThoughtRecord {
            thought: captures[1].trim().to_string(),
            confidence: rating_capture(captures.get(2).map(|m| m.as_str())),
        })
        .collect();

    (!thoughts.is_empty()).then_some(SectionData::RationalThoughts(thoughts))
}

fn belief_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(?:💭|[•\-*])?\s*\*\*Belief\*\*:\s*["“]?([^"“”\n]+?)["”]?\s*$"#)
            .expect("belief line regex should compile")
    })
}

fn credibility_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*[•\-*]?\s*\*\*Credibility\*\*:\s*(\d{1,2})\s*/\s*10")
            .expect("credibility line regex should compile")
    })
}

fn core_belief_section(body: &str) -> Option<SectionData> {
    let belief = belief_line_regex()
        .captures(body)
        .map(|captures| captures[1].trim().to_string())
        .filter(|text| !text.is_empty())?;
    let credibility = credibility_line_regex()
        .captures(body)
        .map_or(0, |captures| rating_capture(Some(&captures[1])));

    Some(SectionData::CoreBelief(CoreBeliefRecord { belief, credibility }))
}

fn challenge_pair_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*\d+\.\s*\*\*(.+?)\*\*\s*\r?\n\s*(?:→|->)\s*(.+)$")
            .expect("challenge pair regex should compile")
    })
}

fn challenge_questions_section(body: &str) -> Option<SectionData> {
    let questions: Vec<ChallengeQuestionRecord> = challenge_pair_regex()
        .captures_iter(body)
        .map(|captures| ChallengeQuestionRecord {
            question: captures[1].trim().to_string(),
            answer: captures[2].trim().to_string(),
        })
        .collect();

    (!questions.is_empty()).then_some(SectionData::ChallengeQuestions(questions))
}

fn mode_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^\s*[•\-*]\s*\*\*([^*]+)\*\*\s*\((\d{1,2})\s*/\s*10\)\s*(?::\s*(.+))?$")
            .expect("mode line regex should compile")
    })
}

fn schema_modes_section(body: &str) -> Option<SectionData> {
    let modes: Vec<SchemaModeRecord> = mode_line_regex()
        .captures_iter(body)
        .map(|captures| {
            let name = captures[1].trim().to_string();
            let description = captures
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| name.clone());

            SchemaModeRecord {
                name,
                intensity: rating_capture(Some(&captures[2])),
                description,
            }
        })
        .collect();

    (!modes.is_empty()).then_some(SectionData::SchemaModes(modes))
}

fn bullet_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*[•\-*]\s+(.+)$").expect("bullet line regex should compile")
    })
}

fn action_plan_section(body: &str) -> Option<SectionData> {
    let new_behaviors = labeled_bullets(body, "**New Behaviors**");
    let alternative_responses = labeled_bullets(body, "**Alternative Responses**");

    if new_behaviors.is_empty() && alternative_responses.is_empty() {
        return None;
    }

    Some(SectionData::ActionPlan(ActionPlanRecord {
        new_behaviors,
        alternative_responses: (!alternative_responses.is_empty()).then_some(alternative_responses),
    }))
}

/// Collects the consecutive bullet lines following a bold label.
fn labeled_bullets(body: &str, label: &str) -> Vec<String> {
    let Some(start) = body.find(label) else {
        return Vec::new();
    };

    let mut bullets = Vec::new();
    for line in body[start + label.len()..].lines().skip(1) {
        match bullet_line_regex().captures(line) {
            Some(captures) => bullets.push(captures[1].trim().to_string()),
            None if bullets.is_empty() && line.trim().is_empty() => {}
            None => break,
        }
    }
    bullets
}

fn comparison_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*[•\-*]\s*\*\*([^*]+)\*\*:\s*(\d{1,2})\s*/\s*10\s*(?:→|->)\s*(\d{1,2})\s*/\s*10",
        )
        .expect("comparison line regex should compile")
    })
}

fn emotion_comparison_section(body: &str) -> Option<SectionData> {
    let entries: Vec<EmotionComparisonEntry> = comparison_line_regex()
        .captures_iter(body)
        .filter_map(|captures| {
            EmotionComparisonEntry::between(
                captures[1].trim(),
                rating_capture(Some(&captures[2])),
                rating_capture(Some(&captures[3])),
            )
        })
        .collect();

    (!entries.is_empty()).then_some(SectionData::EmotionComparison(entries))
}

fn rating_capture(capture: Option<&str>) -> u8 {
    capture
        .and_then(|text| text.trim().parse::<i64>().ok())
        .map_or(0, crate::utils::scale::clamp_scale)
}
