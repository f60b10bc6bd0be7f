use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::extractors::SourceFormat;
use crate::extractors::card::{contains_summary_card, extract_summary_card};
use crate::extractors::sections::{
    SectionData, SectionKind, extract_section, section_rule_catalog,
};
use crate::models::assessment::{CbtAssessment, EmotionPair, compare_emotion_sets};
use crate::models::message::ChatMessage;

pub const EXTRACT_STATS_SCHEMA_VERSION: &str = "reframe.extract-stats.v1";

/// An extraction plus its provenance, used by the CLI artifact path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub assessment: CbtAssessment,
    pub source_format: SourceFormat,
    pub sections_found: Vec<&'static str>,
    pub warnings: Vec<String>,
}

/// Reconstructs the structured record from a message list.
///
/// Pure and deterministic: re-running on the same list yields a
/// structurally equal record.
#[must_use]
pub fn parse_all_cbt_data(messages: &[ChatMessage]) -> CbtAssessment {
    extract_with_provenance(messages).assessment
}

/// Cheap existence check for either wire format, used by callers to
/// decide whether to run full extraction at all.
#[must_use]
pub fn has_cbt_data(messages: &[ChatMessage]) -> bool {
    messages.iter().any(|message| {
        contains_summary_card(&message.content)
            || section_rule_catalog()
                .iter()
                .any(|rule| message.content.contains(rule.header))
    })
}

/// Full extraction with provenance.
///
/// The card format, when present anywhere in the transcript, fully
/// supersedes markdown parsing: the first card hit is returned as-is
/// even when markdown sections also exist. Otherwise one pass over the
/// messages (both roles, original order) accumulates markdown
/// sections: first successful extraction wins per section, except
/// emotions, where the first hit is the initial set and a second hit
/// from a later message is the final set.
#[must_use]
pub fn extract_with_provenance(messages: &[ChatMessage]) -> ExtractionOutcome {
    for message in messages {
        if let Some(assessment) = extract_summary_card(&message.content) {
            let sections_found = assessment.populated_domains();
            return ExtractionOutcome {
                assessment,
                source_format: SourceFormat::Card,
                sections_found,
                warnings: Vec::new(),
            };
        }
    }

    let mut aggregator = SectionAggregator::default();
    for message in messages {
        for rule in section_rule_catalog() {
            if !aggregator.wants(rule.kind) {
                continue;
            }
            if let Some(data) = extract_section(&message.content, rule) {
                aggregator.merge(rule.kind, data);
            }
        }
    }

    aggregator.finish()
}

/// Cross-message accumulation state for the markdown path.
///
/// The one piece of state beyond first-wins is the emotion slot pair:
/// the legacy format repeats the emotion section in the action-plan
/// message to capture the post-exercise ratings.
#[derive(Debug, Default)]
struct SectionAggregator {
    assessment: CbtAssessment,
    emotion_sections_seen: usize,
    sections_found: Vec<&'static str>,
    warnings: Vec<String>,
}

impl SectionAggregator {
    /// Whether a section of this kind can still contribute.
    fn wants(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Situation => self.assessment.situation.is_none(),
            // Emotion sections keep matching so repeats past the
            // initial/final pair are counted and warned about.
            SectionKind::Emotions => true,
            SectionKind::Thoughts => self.assessment.thoughts.is_none(),
            SectionKind::CoreBelief => self.assessment.core_belief.is_none(),
            SectionKind::ChallengeQuestions => self.assessment.challenge_questions.is_none(),
            SectionKind::RationalThoughts => self.assessment.rational_thoughts.is_none(),
            SectionKind::SchemaModes => self.assessment.schema_modes.is_none(),
            SectionKind::ActionPlan => self.assessment.action_plan.is_none(),
            SectionKind::EmotionComparison => self.assessment.emotion_comparison.is_none(),
        }
    }

    fn merge(&mut self, kind: SectionKind, data: SectionData) {
        match data {
            SectionData::Emotions(set) => {
                self.emotion_sections_seen += 1;
                match self.emotion_sections_seen {
                    1 => {
                        self.assessment.emotions = Some(EmotionPair {
                            initial: set,
                            r#final: None,
                        });
                    }
                    2 => {
                        if let Some(pair) = &mut self.assessment.emotions {
                            pair.r#final = Some(set);
                        }
                    }
                    _ => return,
                }
            }
            SectionData::Situation(record) => self.assessment.situation = Some(record),
            SectionData::Thoughts(thoughts) => self.assessment.thoughts = Some(thoughts),
            SectionData::CoreBelief(record) => self.assessment.core_belief = Some(record),
            SectionData::ChallengeQuestions(questions) => {
                self.assessment.challenge_questions = Some(questions);
            }
            SectionData::RationalThoughts(thoughts) => {
                self.assessment.rational_thoughts = Some(thoughts);
            }
            SectionData::SchemaModes(modes) => self.assessment.schema_modes = Some(modes),
            SectionData::ActionPlan(plan) => self.assessment.action_plan = Some(plan),
            SectionData::EmotionComparison(entries) => {
                self.assessment.emotion_comparison = Some(entries);
            }
        }
        self.sections_found.push(kind.as_str());
    }

    fn finish(mut self) -> ExtractionOutcome {
        // No explicit comparison section but both rating sets present:
        // derive the per-channel shifts from the pair.
        if self.assessment.emotion_comparison.is_none()
            && let Some(pair) = &self.assessment.emotions
            && let Some(r#final) = &pair.r#final
        {
            let entries = compare_emotion_sets(&pair.initial, r#final);
            if !entries.is_empty() {
                self.assessment.emotion_comparison = Some(entries);
            }
        }

        if self.emotion_sections_seen > 2 {
            self.warnings.push(format!(
                "{} emotion sections found; keeping the first as initial and the second as final",
                self.emotion_sections_seen
            ));
        }

        let source_format = if self.sections_found.is_empty() {
            SourceFormat::None
        } else {
            SourceFormat::Markdown
        };

        ExtractionOutcome {
            assessment: self.assessment,
            source_format,
            sections_found: self.sections_found,
            warnings: self.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractCounts {
    pub messages: usize,
    pub sections_found: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub schema_version: String,
    pub source_format: String,
    pub counts: ExtractCounts,
    pub section_contributions: BTreeMap<String, usize>,
}

/// Stats document for the extract artifact. Section counters are
/// seeded with every known kind; absent sections report zero.
#[must_use]
pub fn build_extract_stats(outcome: &ExtractionOutcome, message_count: usize) -> ExtractStats {
    let mut section_contributions: BTreeMap<String, usize> = section_rule_catalog()
        .iter()
        .map(|rule| (rule.kind.as_str().to_string(), 0))
        .collect();
    for section in &outcome.sections_found {
        if let Some(count) = section_contributions.get_mut(*section) {
            *count += 1;
        }
    }

    ExtractStats {
        schema_version: EXTRACT_STATS_SCHEMA_VERSION.to_string(),
        source_format: outcome.source_format.as_str().to_string(),
        counts: ExtractCounts {
            messages: message_count,
            sections_found: outcome.sections_found.len(),
            warnings: outcome.warnings.len(),
        },
        section_contributions,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractArtifactLayout {
    pub assessment_json: PathBuf,
    pub schema_json: PathBuf,
    pub stats_json: PathBuf,
}

#[must_use]
pub fn build_artifact_layout(out_dir: &Path) -> ExtractArtifactLayout {
    let extract_dir = out_dir.join("extract");
    ExtractArtifactLayout {
        assessment_json: extract_dir.join("assessment.json"),
        schema_json: extract_dir.join("cbtrecord.v1.schema.json"),
        stats_json: extract_dir.join("stats.json"),
    }
}

pub fn write_assessment_artifact(path: &Path, assessment: &CbtAssessment) -> Result<()> {
    write_json_artifact(path, assessment, "assessment")
}

pub fn write_schema_artifact(path: &Path) -> Result<()> {
    let schema = crate::models::assessment::json_schema();
    write_json_artifact(path, &schema, "schema")
}

pub fn write_stats_artifact(path: &Path, stats: &ExtractStats) -> Result<()> {
    write_json_artifact(path, stats, "stats")
}

fn write_json_artifact<T: Serialize>(path: &Path, document: &T, what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {what} artifact directory"))?;
    }

    let encoded = serde_json::to_vec_pretty(document)
        .with_context(|| format!("failed to encode {what} json"))?;
    std::fs::write(path, encoded).with_context(|| format!("failed to write {what} artifact"))
}
