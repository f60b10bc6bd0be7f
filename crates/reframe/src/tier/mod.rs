pub mod signals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::message::ChatMessage;
use crate::models::tier::{
    AnalysisDepth, AnalysisRecommendation, ContentTier, ContentTierAnalysis, SchemaReflectionDepth,
};

use signals::{ContentSignals, ContextSignals, content_signals, context_signals};

/// One entry of a tier's scoring policy: a recorded trigger label, the
/// predicate over the computed signals, and the confidence weight it
/// contributes.
struct TierRule {
    trigger: &'static str,
    applies: fn(&ContentSignals, &ContextSignals) -> bool,
    weight: u8,
}

const CONFIDENCE_CAP: u8 = 100;
const TIER1_BASE_CONFIDENCE: u8 = 85;
const TIER2_BASE_CONFIDENCE: u8 = 65;
const TIER3_BASE_CONFIDENCE: u8 = 60;

/// Premium gate: any rule firing promotes the transcript to tier 1.
const TIER1_RULES: &[TierRule] = &[
    TierRule {
        trigger: "strong_cbt_signature",
        applies: |content, _| content.cbt_signature >= 0.7,
        weight: 10,
    },
    TierRule {
        trigger: "schema_reflection_present",
        applies: |content, _| content.schema_reflection_present,
        weight: 8,
    },
    TierRule {
        trigger: "self_assessment_with_reflection_depth",
        applies: |content, _| {
            content.self_assessment_present
                && content.reflection_depth != SchemaReflectionDepth::None
        },
        weight: 7,
    },
    TierRule {
        trigger: "partial_signature_with_self_assessment",
        applies: |content, _| content.cbt_signature >= 0.4 && content.self_assessment_present,
        weight: 5,
    },
];

const TIER2_RULES: &[TierRule] = &[
    TierRule {
        trigger: "high_therapeutic_relevance",
        applies: |_, context| context.therapeutic_relevance >= 7,
        weight: 10,
    },
    TierRule {
        trigger: "moderate_therapeutic_relevance",
        applies: |_, context| {
            context.therapeutic_relevance >= 5 && context.therapeutic_relevance < 7
        },
        weight: 7,
    },
    TierRule {
        trigger: "baseline_therapeutic_relevance",
        applies: |_, context| context.therapeutic_relevance < 5,
        weight: 4,
    },
    TierRule {
        trigger: "high_emotional_intensity",
        applies: |_, context| context.emotional_intensity >= 6,
        weight: 8,
    },
    TierRule {
        trigger: "moderate_emotional_intensity",
        applies: |_, context| {
            context.emotional_intensity >= 4 && context.emotional_intensity < 6
        },
        weight: 4,
    },
    TierRule {
        trigger: "mild_emotional_intensity",
        applies: |_, context| {
            context.emotional_intensity >= 2 && context.emotional_intensity < 4
        },
        weight: 2,
    },
    TierRule {
        trigger: "clinically_relevant_topic",
        applies: |_, context| context.therapeutic_relevance >= 7,
        weight: 5,
    },
    TierRule {
        trigger: "multiple_stress_indicators",
        applies: |_, context| context.stress_indicators >= 2,
        weight: 6,
    },
    TierRule {
        trigger: "partial_cbt_signature",
        applies: |content, _| content.cbt_signature >= 0.3 && content.cbt_signature < 0.7,
        weight: 5,
    },
    TierRule {
        trigger: "quantified_self_assessment",
        applies: |content, _| content.self_assessment_present,
        weight: 8,
    },
];

const TIER3_RULES: &[TierRule] = &[
    TierRule {
        trigger: "brief_request",
        applies: |_, context| context.brief_request,
        weight: 10,
    },
    TierRule {
        trigger: "neutral_context",
        applies: |_, context| context.neutral_context || context.organizational_context,
        weight: 8,
    },
    TierRule {
        trigger: "low_emotional_intensity",
        applies: |_, context| context.emotional_intensity < 2,
        weight: 6,
    },
    TierRule {
        trigger: "explicit_exclusion",
        applies: |_, context| context.exclusion_reason.is_some(),
        weight: 10,
    },
    // A user who bothers to self-rate must never be dropped to
    // minimal with low confidence.
    TierRule {
        trigger: "quantified_self_assessment",
        applies: |content, _| content.self_assessment_present,
        weight: 20,
    },
];

/// Classifies the concatenated user-role text of a transcript.
///
/// Deterministic and ordered: empty text short-circuits to tier 3,
/// the tier-1 gate runs on structural cues, the tier-3 gates on
/// contextual validation, and everything else lands in tier 2 with a
/// final confidence re-bounding clamp.
#[must_use]
pub fn analyze_content_tier(messages: &[ChatMessage]) -> ContentTierAnalysis {
    let text = messages
        .iter()
        .filter(|message| message.is_user())
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();

    if text.is_empty() {
        return empty_transcript_analysis();
    }

    let content = content_signals(text);
    let context = context_signals(text);

    let mut triggers = Vec::new();
    let tier1_confidence = fold_rules(
        TIER1_BASE_CONFIDENCE,
        TIER1_RULES,
        &content,
        &context,
        &mut triggers,
    );
    if !triggers.is_empty() {
        return build_analysis(
            ContentTier::Tier1Premium,
            tier1_confidence,
            triggers,
            &content,
            &context,
        );
    }

    if minimal_gate(&content, &context) {
        let mut triggers = Vec::new();
        let confidence = fold_rules(
            TIER3_BASE_CONFIDENCE,
            TIER3_RULES,
            &content,
            &context,
            &mut triggers,
        );
        return build_analysis(
            ContentTier::Tier3Minimal,
            confidence,
            triggers,
            &content,
            &context,
        );
    }

    let mut triggers = Vec::new();
    let confidence = fold_rules(
        TIER2_BASE_CONFIDENCE,
        TIER2_RULES,
        &content,
        &context,
        &mut triggers,
    );
    build_analysis(
        ContentTier::Tier2Standard,
        rebound_tier2_confidence(confidence, &context),
        triggers,
        &content,
        &context,
    )
}

/// Folds a rule catalog left-to-right into a confidence score,
/// recording the label of every rule that fired.
fn fold_rules(
    base: u8,
    rules: &[TierRule],
    content: &ContentSignals,
    context: &ContextSignals,
    triggers: &mut Vec<String>,
) -> u8 {
    rules.iter().fold(base, |confidence, rule| {
        if (rule.applies)(content, context) {
            triggers.push(rule.trigger.to_string());
            confidence.saturating_add(rule.weight).min(CONFIDENCE_CAP)
        } else {
            confidence
        }
    })
}

fn minimal_gate(content: &ContentSignals, context: &ContextSignals) -> bool {
    if content.self_assessment_present {
        return false;
    }

    let invalid = !context.is_valid_therapeutic_context();
    let brief_and_flat =
        context.brief_request && invalid && context.emotional_intensity < 2;
    let low_signal = invalid
        && context.emotional_intensity < 3
        && context.therapeutic_relevance < 3;

    brief_and_flat || low_signal
}

/// Final clamp step: re-bounds tier-2 confidence by intensity band.
fn rebound_tier2_confidence(confidence: u8, context: &ContextSignals) -> u8 {
    if context.emotional_intensity <= 3 {
        confidence.min(72)
    } else if context.emotional_intensity >= 8 || context.stress_indicators >= 4 {
        confidence.max(81)
    } else if context.emotional_intensity >= 6 {
        confidence.min(82)
    } else {
        confidence.min(78)
    }
}

fn build_analysis(
    tier: ContentTier,
    confidence: u8,
    triggers: Vec<String>,
    content: &ContentSignals,
    context: &ContextSignals,
) -> ContentTierAnalysis {
    ContentTierAnalysis {
        tier,
        confidence: confidence.min(CONFIDENCE_CAP),
        triggers,
        analysis_recommendation: recommendation_for(tier, content, context),
        user_self_assessment_present: content.self_assessment_present,
        schema_reflection_depth: content.reflection_depth,
    }
}

fn recommendation_for(
    tier: ContentTier,
    content: &ContentSignals,
    context: &ContextSignals,
) -> AnalysisRecommendation {
    match tier {
        ContentTier::Tier1Premium => AnalysisRecommendation {
            analysis_depth: AnalysisDepth::Full,
            should_analyze_cognitive_distortions: true,
            should_analyze_schemas: true,
            should_generate_action_items: true,
            should_generate_insights: true,
            prioritize_user_self_assessment: true,
        },
        ContentTier::Tier2Standard => AnalysisRecommendation {
            analysis_depth: AnalysisDepth::Standard,
            should_analyze_cognitive_distortions: context.is_valid_therapeutic_context(),
            should_analyze_schemas: context.emotional_intensity >= 6
                || content.reflection_depth != SchemaReflectionDepth::None,
            should_generate_action_items: context.emotional_intensity >= 5,
            should_generate_insights: true,
            prioritize_user_self_assessment: content.self_assessment_present,
        },
        // Hard safety invariant: minimal-tier content never triggers
        // deep cognitive-distortion or schema analysis.
        ContentTier::Tier3Minimal => AnalysisRecommendation {
            analysis_depth: AnalysisDepth::Minimal,
            should_analyze_cognitive_distortions: false,
            should_analyze_schemas: false,
            should_generate_action_items: false,
            should_generate_insights: content.self_assessment_present,
            prioritize_user_self_assessment: content.self_assessment_present,
        },
    }
}

fn empty_transcript_analysis() -> ContentTierAnalysis {
    ContentTierAnalysis {
        tier: ContentTier::Tier3Minimal,
        confidence: CONFIDENCE_CAP,
        triggers: Vec::new(),
        analysis_recommendation: AnalysisRecommendation {
            analysis_depth: AnalysisDepth::Minimal,
            should_analyze_cognitive_distortions: false,
            should_analyze_schemas: false,
            should_generate_action_items: false,
            should_generate_insights: false,
            prioritize_user_self_assessment: false,
        },
        user_self_assessment_present: false,
        schema_reflection_depth: SchemaReflectionDepth::None,
    }
}

pub const TIER_ANALYSIS_SCHEMA_VERSION: &str = "reframe.tier-analysis.v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierArtifactLayout {
    pub analysis_json: PathBuf,
}

#[must_use]
pub fn build_artifact_layout(out_dir: &Path) -> TierArtifactLayout {
    TierArtifactLayout {
        analysis_json: out_dir.join("tier").join("analysis.json"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TierAnalysisDocument<'a> {
    schema_version: &'static str,
    #[serde(flatten)]
    analysis: &'a ContentTierAnalysis,
}

pub fn write_analysis_artifact(path: &Path, analysis: &ContentTierAnalysis) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create tier artifact directory")?;
    }

    let document = TierAnalysisDocument {
        schema_version: TIER_ANALYSIS_SCHEMA_VERSION,
        analysis,
    };
    let encoded =
        serde_json::to_vec_pretty(&document).context("failed to encode tier analysis json")?;
    std::fs::write(path, encoded).context("failed to write tier analysis artifact")
}
