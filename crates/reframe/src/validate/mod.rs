use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::assessment::{EmotionKind, EmotionSet};
use crate::models::form::ParsedCbtForm;

pub const FORM_REPORT_SCHEMA_VERSION: &str = "reframe.form-report.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    Baseline,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub severity: IssueSeverity,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessScorecard {
    pub overall_score: u8,
    pub situation_score: u8,
    pub emotion_score: u8,
    pub cognitive_score: u8,
    pub reflection_score: u8,
    pub weakest_dimensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValidationReport {
    pub schema_version: String,
    pub mode: ValidationMode,
    pub status: ValidationStatus,
    pub interpreted_exit_code: i32,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
    pub errors: usize,
    pub warnings: usize,
    pub quality_scorecard: CompletenessScorecard,
    pub issues: Vec<ValidationIssue>,
}

impl FormValidationReport {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.errors > 0 { 2 } else { 0 }
    }
}

/// One completeness check over the parsed form. Required fields error
/// regardless of mode; optional fields warn in baseline mode and
/// error in strict mode.
struct CompletenessCheck {
    field: &'static str,
    required: bool,
    holds: fn(&ParsedCbtForm) -> bool,
}

const COMPLETENESS_CHECKS: &[CompletenessCheck] = &[
    CompletenessCheck {
        field: "situation",
        required: true,
        holds: |form| !form.situation.trim().is_empty(),
    },
    CompletenessCheck {
        field: "emotions",
        required: true,
        holds: |form| form.initial_emotions.any_rated() || form.final_emotions.any_rated(),
    },
    CompletenessCheck {
        field: "date",
        required: false,
        holds: |form| !form.date.is_empty(),
    },
    CompletenessCheck {
        field: "automatic_thoughts",
        required: false,
        holds: |form| !form.automatic_thoughts.is_empty(),
    },
    CompletenessCheck {
        field: "rational_thoughts",
        required: false,
        holds: |form| !form.rational_thoughts.is_empty(),
    },
    CompletenessCheck {
        field: "core_belief",
        required: false,
        holds: |form| !form.core_belief.trim().is_empty(),
    },
    CompletenessCheck {
        field: "schema_modes",
        required: false,
        holds: |form| form.schema_modes.iter().any(|mode| mode.selected),
    },
    CompletenessCheck {
        field: "challenge_questions",
        required: false,
        holds: |form| {
            !form.challenge_questions.is_empty() || !form.additional_questions.is_empty()
        },
    },
    CompletenessCheck {
        field: "new_behaviors",
        required: false,
        holds: |form| !form.new_behaviors.trim().is_empty(),
    },
];

/// Builds the completeness report for a parsed diary form.
#[must_use]
pub fn validate_form(form: &ParsedCbtForm, mode: ValidationMode) -> FormValidationReport {
    let mut issues = Vec::new();

    for check in COMPLETENESS_CHECKS {
        if (check.holds)(form) {
            continue;
        }

        let severity = if check.required {
            IssueSeverity::Error
        } else {
            optional_miss_severity(mode)
        };
        issues.push(ValidationIssue {
            field: check.field.to_string(),
            severity,
            detail: format!("`{}` is empty or unrated", check.field),
        });
    }

    for error in &form.parsing_errors {
        issues.push(ValidationIssue {
            field: "parsing".to_string(),
            severity: IssueSeverity::Warning,
            detail: error.clone(),
        });
    }

    let errors = issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Warning)
        .count();

    FormValidationReport {
        schema_version: FORM_REPORT_SCHEMA_VERSION.to_string(),
        mode,
        status: validation_status(errors, warnings),
        interpreted_exit_code: if errors > 0 { 2 } else { 0 },
        is_complete: form.is_complete,
        missing_fields: form.missing_fields.clone(),
        errors,
        warnings,
        quality_scorecard: build_scorecard(form),
        issues,
    }
}

const fn optional_miss_severity(mode: ValidationMode) -> IssueSeverity {
    match mode {
        ValidationMode::Baseline => IssueSeverity::Warning,
        ValidationMode::Strict => IssueSeverity::Error,
    }
}

const fn validation_status(errors: usize, warnings: usize) -> ValidationStatus {
    if errors > 0 {
        ValidationStatus::Fail
    } else if warnings > 0 {
        ValidationStatus::Warn
    } else {
        ValidationStatus::Pass
    }
}

fn build_scorecard(form: &ParsedCbtForm) -> CompletenessScorecard {
    let situation_score = if form.situation.trim().is_empty() { 0 } else { 100 };

    let rated = rated_channel_count(form);
    let emotion_score = ratio_to_score(rated, 16);

    let cognitive_present = [
        !form.automatic_thoughts.is_empty(),
        !form.rational_thoughts.is_empty(),
        !form.core_belief.trim().is_empty(),
        !form.challenge_questions.is_empty() || !form.additional_questions.is_empty(),
        form.thought_credibility > 0,
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    let cognitive_score = ratio_to_score(cognitive_present, 5);

    let reflection_present = [
        form.schema_modes.iter().any(|mode| mode.selected),
        !form.schema_reflection.trim().is_empty(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    let reflection_score = ratio_to_score(reflection_present, 2);

    let dimensions = [
        ("situation".to_string(), situation_score),
        ("emotions".to_string(), emotion_score),
        ("cognitive".to_string(), cognitive_score),
        ("reflection".to_string(), reflection_score),
    ];

    let overall_score = ((u32::from(situation_score)
        + u32::from(emotion_score)
        + u32::from(cognitive_score)
        + u32::from(reflection_score)) as f64
        / 4.0)
        .round() as u8;

    let mut weakest_ranked = dimensions.to_vec();
    weakest_ranked.sort_by(|left, right| left.1.cmp(&right.1).then_with(|| left.0.cmp(&right.0)));
    let weakest_dimensions = weakest_ranked
        .into_iter()
        .take(2)
        .map(|(name, _)| name)
        .collect();

    CompletenessScorecard {
        overall_score,
        situation_score,
        emotion_score,
        cognitive_score,
        reflection_score,
        weakest_dimensions,
    }
}

fn rated_channel_count(form: &ParsedCbtForm) -> usize {
    let count_set = |set: &EmotionSet| {
        EmotionKind::ALL
            .into_iter()
            .filter(|kind| set.get(*kind) > 0)
            .count()
            + usize::from(set.other_intensity > 0)
    };

    count_set(&form.initial_emotions) + count_set(&form.final_emotions)
}

fn ratio_to_score(numerator: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 100;
    }

    (((numerator as f64 / denominator as f64) * 100.0)
        .round()
        .clamp(0.0, 100.0)) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationArtifactLayout {
    pub report_json: PathBuf,
}

#[must_use]
pub fn build_artifact_layout(out_dir: &Path) -> ValidationArtifactLayout {
    ValidationArtifactLayout {
        report_json: out_dir.join("validate").join("report.json"),
    }
}

pub fn write_report_artifact(path: &Path, report: &FormValidationReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create validate artifact directory")?;
    }

    let encoded =
        serde_json::to_vec_pretty(report).context("failed to encode validation report json")?;
    std::fs::write(path, encoded).context("failed to write validation report artifact")
}
