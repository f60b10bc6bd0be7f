use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::scale::clamp_scale;

pub const SCHEMA_VERSION: &str = "cbtrecord.v1";

/// The fixed emotion channels every exercise rates on a 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    Fear,
    Anger,
    Sadness,
    Joy,
    Anxiety,
    Shame,
    Guilt,
}

impl EmotionKind {
    pub const ALL: [Self; 7] = [
        Self::Fear,
        Self::Anger,
        Self::Sadness,
        Self::Joy,
        Self::Anxiety,
        Self::Shame,
        Self::Guilt,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fear => "fear",
            Self::Anger => "anger",
            Self::Sadness => "sadness",
            Self::Joy => "joy",
            Self::Anxiety => "anxiety",
            Self::Shame => "shame",
            Self::Guilt => "guilt",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fear => "Fear",
            Self::Anger => "Anger",
            Self::Sadness => "Sadness",
            Self::Joy => "Joy",
            Self::Anxiety => "Anxiety",
            Self::Shame => "Shame",
            Self::Guilt => "Guilt",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

/// Ratings for the fixed emotion channels plus one open-ended channel.
///
/// Unknown emotion labels fold into `other`/`other_intensity`,
/// last-write-wins. All intensities are clamped to 0..=10 at every
/// write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmotionSet {
    pub fear: u8,
    pub anger: u8,
    pub sadness: u8,
    pub joy: u8,
    pub anxiety: u8,
    pub shame: u8,
    pub guilt: u8,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub other: String,
    #[serde(skip_serializing_if = "u8_is_zero")]
    pub other_intensity: u8,
}

const fn u8_is_zero(value: &u8) -> bool {
    *value == 0
}

impl EmotionSet {
    pub fn set(&mut self, label: &str, intensity: i64) {
        let intensity = clamp_scale(intensity);
        match EmotionKind::from_label(label) {
            Some(kind) => *self.channel_mut(kind) = intensity,
            None => {
                let label = label.trim();
                if !label.is_empty() {
                    self.other = label.to_string();
                    self.other_intensity = intensity;
                }
            }
        }
    }

    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let mut set = Self::default();
        for (label, intensity) in entries {
            set.set(label, intensity);
        }
        set
    }

    #[must_use]
    pub const fn get(&self, kind: EmotionKind) -> u8 {
        match kind {
            EmotionKind::Fear => self.fear,
            EmotionKind::Anger => self.anger,
            EmotionKind::Sadness => self.sadness,
            EmotionKind::Joy => self.joy,
            EmotionKind::Anxiety => self.anxiety,
            EmotionKind::Shame => self.shame,
            EmotionKind::Guilt => self.guilt,
        }
    }

    const fn channel_mut(&mut self, kind: EmotionKind) -> &mut u8 {
        match kind {
            EmotionKind::Fear => &mut self.fear,
            EmotionKind::Anger => &mut self.anger,
            EmotionKind::Sadness => &mut self.sadness,
            EmotionKind::Joy => &mut self.joy,
            EmotionKind::Anxiety => &mut self.anxiety,
            EmotionKind::Shame => &mut self.shame,
            EmotionKind::Guilt => &mut self.guilt,
        }
    }

    /// True when at least one channel carries a non-zero rating; the
    /// open-ended channel counts.
    #[must_use]
    pub fn any_rated(&self) -> bool {
        EmotionKind::ALL.into_iter().any(|kind| self.get(kind) > 0) || self.other_intensity > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmotionPair {
    pub initial: EmotionSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#final: Option<EmotionSet>,
}

impl Default for EmotionPair {
    fn default() -> Self {
        Self {
            initial: EmotionSet::default(),
            r#final: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SituationRecord {
    pub date: String,
    pub description: String,
}

/// An automatic thought with how believable it felt (0..=10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThoughtRecord {
    pub thought: String,
    pub credibility: u8,
}

/// An alternative thought with how convincing it is (0..=10).
///
/// Structurally a twin of [`ThoughtRecord`] but the key name differs
/// on the wire; the two are never interchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RationalThoughtRecord {
    pub thought: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoreBeliefRecord {
    pub belief: String,
    pub credibility: u8,
}

/// One question/answer pair; sequence order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChallengeQuestionRecord {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaModeRecord {
    pub name: String,
    pub intensity: u8,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ActionPlanRecord {
    pub new_behaviors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_responses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Increased,
    Decreased,
}

/// How one emotion channel moved between the initial and final rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmotionComparisonEntry {
    pub emotion: String,
    pub initial: u8,
    pub r#final: u8,
    pub direction: ChangeDirection,
    pub change: u8,
}

impl EmotionComparisonEntry {
    /// Builds a comparison entry; unchanged ratings produce none.
    #[must_use]
    pub fn between(emotion: impl Into<String>, initial: u8, r#final: u8) -> Option<Self> {
        if initial == r#final {
            return None;
        }

        let direction = if r#final > initial {
            ChangeDirection::Increased
        } else {
            ChangeDirection::Decreased
        };

        Some(Self {
            emotion: emotion.into(),
            initial,
            r#final,
            direction,
            change: initial.abs_diff(r#final),
        })
    }
}

/// Derives per-channel comparison entries from an initial/final pair.
///
/// The open-ended channel contributes only when both sets carry the
/// same label.
#[must_use]
pub fn compare_emotion_sets(initial: &EmotionSet, r#final: &EmotionSet) -> Vec<EmotionComparisonEntry> {
    let mut entries: Vec<EmotionComparisonEntry> = EmotionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            EmotionComparisonEntry::between(kind.display_name(), initial.get(kind), r#final.get(kind))
        })
        .collect();

    if !initial.other.is_empty() && initial.other.eq_ignore_ascii_case(&r#final.other) {
        entries.extend(EmotionComparisonEntry::between(
            initial.other.clone(),
            initial.other_intensity,
            r#final.other_intensity,
        ));
    }

    entries
}

/// The canonical structured record reconstructed from a transcript.
///
/// Every field is optional: absence means the transcript did not carry
/// that section, never that the user provided empty data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CbtAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<SituationRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotions: Option<EmotionPair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<Vec<ThoughtRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_belief: Option<CoreBeliefRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_questions: Option<Vec<ChallengeQuestionRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rational_thoughts: Option<Vec<RationalThoughtRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_modes: Option<Vec<SchemaModeRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<ActionPlanRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_comparison: Option<Vec<EmotionComparisonEntry>>,
}

impl CbtAssessment {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.situation.is_none()
            && self.emotions.is_none()
            && self.thoughts.is_none()
            && self.core_belief.is_none()
            && self.challenge_questions.is_none()
            && self.rational_thoughts.is_none()
            && self.schema_modes.is_none()
            && self.action_plan.is_none()
            && self.emotion_comparison.is_none()
    }

    /// Domain keys of the populated fields, in canonical order.
    #[must_use]
    pub fn populated_domains(&self) -> Vec<&'static str> {
        let mut domains = Vec::new();
        if self.situation.is_some() {
            domains.push("situation");
        }
        if self.emotions.is_some() {
            domains.push("emotions");
        }
        if self.thoughts.is_some() {
            domains.push("thoughts");
        }
        if self.core_belief.is_some() {
            domains.push("core_belief");
        }
        if self.challenge_questions.is_some() {
            domains.push("challenge_questions");
        }
        if self.rational_thoughts.is_some() {
            domains.push("rational_thoughts");
        }
        if self.schema_modes.is_some() {
            domains.push("schema_modes");
        }
        if self.action_plan.is_some() {
            domains.push("action_plan");
        }
        if self.emotion_comparison.is_some() {
            domains.push("emotion_comparison");
        }
        domains
    }
}

#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(CbtAssessment);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated cbtrecord schema: {error}");
        }
    }
}
