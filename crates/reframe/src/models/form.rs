use serde::{Deserialize, Serialize};

use super::assessment::{
    ActionPlanRecord, CbtAssessment, ChallengeQuestionRecord, CoreBeliefRecord, EmotionPair,
    EmotionSet, RationalThoughtRecord, SchemaModeRecord, SituationRecord, ThoughtRecord,
    compare_emotion_sets,
};
use crate::utils::date::UNKNOWN_DATE;

/// Canonical schema-therapy mode vocabulary used to seed the "all
/// unselected" checkbox list before extraction. Always passed in as
/// an argument, never read as module state.
pub const CANONICAL_SCHEMA_MODES: &[&str] = &[
    "Vulnerable Child",
    "Angry Child",
    "Impulsive Child",
    "Happy Child",
    "Compliant Surrender",
    "Detached Protector",
    "Punitive Parent",
    "Demanding Parent",
    "Healthy Adult",
];

/// One checkbox row of the diary's schema-mode list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchemaMode {
    pub name: String,
    pub selected: bool,
    pub intensity: u8,
}

/// The fully defaulted form shape reconstructed by the diary path.
///
/// Unlike [`CbtAssessment`], every field is always present: extractors
/// default to empty/zero on miss and completeness is reported through
/// `missing_fields` instead of absent fields. `to_assessment` maps the
/// form onto the partial shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCbtForm {
    pub date: String,
    pub situation: String,
    pub initial_emotions: EmotionSet,
    pub final_emotions: EmotionSet,
    pub automatic_thoughts: Vec<String>,
    /// Credibility of the original (first) automatic thought, 0..=10.
    pub thought_credibility: u8,
    pub rational_thoughts: Vec<String>,
    /// Core belief / behavioral pattern free text.
    pub core_belief: String,
    pub schema_modes: Vec<FormSchemaMode>,
    pub schema_reflection: String,
    pub challenge_questions: Vec<ChallengeQuestionRecord>,
    pub additional_questions: Vec<ChallengeQuestionRecord>,
    pub new_behaviors: String,

    pub is_complete: bool,
    pub missing_fields: Vec<String>,
    pub parsing_errors: Vec<String>,
}

impl ParsedCbtForm {
    /// A fresh form with the mode checkbox list seeded all-unselected.
    #[must_use]
    pub fn seeded(mode_vocabulary: &[&str]) -> Self {
        Self {
            schema_modes: mode_vocabulary
                .iter()
                .map(|name| FormSchemaMode {
                    name: (*name).to_string(),
                    selected: false,
                    intensity: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Recomputes `is_complete` and `missing_fields`.
    ///
    /// A complete form has a non-empty situation and at least one
    /// non-zero emotion rating (the open-ended channel counts). Every
    /// other empty section is reported, never fatal.
    pub fn recompute_completeness(&mut self) {
        let mut missing = Vec::new();

        if self.date.is_empty() || self.date == UNKNOWN_DATE {
            missing.push("date".to_string());
        }
        if self.situation.trim().is_empty() {
            missing.push("situation".to_string());
        }
        let any_emotion = self.initial_emotions.any_rated() || self.final_emotions.any_rated();
        if !any_emotion {
            missing.push("emotions".to_string());
        }
        if self.automatic_thoughts.is_empty() {
            missing.push("automatic_thoughts".to_string());
        }
        if self.rational_thoughts.is_empty() {
            missing.push("rational_thoughts".to_string());
        }
        if self.core_belief.trim().is_empty() {
            missing.push("core_belief".to_string());
        }
        if !self.schema_modes.iter().any(|mode| mode.selected) {
            missing.push("schema_modes".to_string());
        }
        if self.schema_reflection.trim().is_empty() {
            missing.push("schema_reflection".to_string());
        }
        if self.challenge_questions.is_empty() {
            missing.push("challenge_questions".to_string());
        }
        if self.new_behaviors.trim().is_empty() {
            missing.push("new_behaviors".to_string());
        }

        self.is_complete = !self.situation.trim().is_empty() && any_emotion;
        self.missing_fields = missing;
    }

    /// Maps the form onto the partial assessment shape.
    ///
    /// Empty sections become absent fields. The form's single
    /// thought-credibility rating attaches to the first automatic
    /// thought; the diary format carries no per-thought confidence, so
    /// rational thoughts map with confidence 0.
    #[must_use]
    pub fn to_assessment(&self) -> CbtAssessment {
        let mut assessment = CbtAssessment::default();

        if !self.situation.trim().is_empty() {
            assessment.situation = Some(SituationRecord {
                date: if self.date.is_empty() {
                    UNKNOWN_DATE.to_string()
                } else {
                    self.date.clone()
                },
                description: self.situation.trim().to_string(),
            });
        }

        if self.initial_emotions.any_rated() {
            assessment.emotions = Some(EmotionPair {
                initial: self.initial_emotions.clone(),
                r#final: self
                    .final_emotions
                    .any_rated()
                    .then(|| self.final_emotions.clone()),
            });

            if self.final_emotions.any_rated() {
                let entries = compare_emotion_sets(&self.initial_emotions, &self.final_emotions);
                if !entries.is_empty() {
                    assessment.emotion_comparison = Some(entries);
                }
            }
        }

        if !self.automatic_thoughts.is_empty() {
            assessment.thoughts = Some(
                self.automatic_thoughts
                    .iter()
                    .enumerate()
                    .map(|(index, thought)| ThoughtRecord {
                        thought: thought.clone(),
                        credibility: if index == 0 { self.thought_credibility } else { 0 },
                    })
                    .collect(),
            );
        }

        if !self.rational_thoughts.is_empty() {
            assessment.rational_thoughts = Some(
                self.rational_thoughts
                    .iter()
                    .map(|thought| RationalThoughtRecord {
                        thought: thought.clone(),
                        confidence: 0,
                    })
                    .collect(),
            );
        }

        if !self.core_belief.trim().is_empty() {
            // The diary's behavioral-pattern section carries no rating
            // of its own; the credibility rating belongs to the
            // original automatic thought.
            assessment.core_belief = Some(CoreBeliefRecord {
                belief: self.core_belief.trim().to_string(),
                credibility: 0,
            });
        }

        let selected_modes: Vec<SchemaModeRecord> = self
            .schema_modes
            .iter()
            .filter(|mode| mode.selected)
            .map(|mode| SchemaModeRecord {
                name: mode.name.clone(),
                intensity: mode.intensity,
                description: mode.name.clone(),
            })
            .collect();
        if !selected_modes.is_empty() {
            assessment.schema_modes = Some(selected_modes);
        }

        let questions: Vec<ChallengeQuestionRecord> = self
            .challenge_questions
            .iter()
            .chain(&self.additional_questions)
            .cloned()
            .collect();
        if !questions.is_empty() {
            assessment.challenge_questions = Some(questions);
        }

        if !self.new_behaviors.trim().is_empty() {
            assessment.action_plan = Some(ActionPlanRecord {
                new_behaviors: self
                    .new_behaviors
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(ToString::to_string)
                    .collect(),
                alternative_responses: None,
            });
        }

        assessment
    }
}
