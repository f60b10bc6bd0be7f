use crate::models::assessment::{CbtAssessment, EmotionKind, EmotionSet};
use crate::models::tier::{ContentTier, ContentTierAnalysis};

/// Human-readable digest of an extracted record: double-spaced,
/// markdown-bold labeled lines in a fixed order. Absent fields
/// contribute no line; an empty assessment yields an empty string.
#[must_use]
pub fn generate_cbt_summary(assessment: &CbtAssessment) -> String {
    let mut lines = Vec::new();

    if let Some(situation) = &assessment.situation {
        lines.push(format!(
            "**Situation**: {} ({})",
            situation.description, situation.date
        ));
    }

    if let Some(emotions) = &assessment.emotions {
        lines.push(format!(
            "**Initial Emotions**: {}",
            rated_channels(&emotions.initial)
        ));
    }

    if let Some(thoughts) = &assessment.thoughts {
        lines.push(format!("**Automatic Thoughts**: {} recorded", thoughts.len()));
    }

    if let Some(belief) = &assessment.core_belief {
        lines.push(format!(
            "**Core Belief**: {} (credibility {}/10)",
            belief.belief, belief.credibility
        ));
    }

    if let Some(modes) = &assessment.schema_modes {
        lines.push(format!("**Schema Modes**: {} active", modes.len()));
    }

    if let Some(comparison) = &assessment.emotion_comparison {
        lines.push(format!("**Emotion Shifts**: {} tracked", comparison.len()));
    }

    lines.join("\n\n")
}

fn rated_channels(set: &EmotionSet) -> String {
    let mut parts: Vec<String> = EmotionKind::ALL
        .into_iter()
        .filter(|kind| set.get(*kind) > 0)
        .map(|kind| format!("{} {}/10", kind.display_name(), set.get(kind)))
        .collect();

    if set.other_intensity > 0 && !set.other.is_empty() {
        parts.push(format!("{} {}/10", set.other, set.other_intensity));
    }

    if parts.is_empty() {
        "none rated".to_string()
    } else {
        parts.join(", ")
    }
}

/// Whether downstream analysis should run at all.
#[must_use]
pub fn meets_analysis_threshold(analysis: &ContentTierAnalysis) -> bool {
    !(analysis.tier == ContentTier::Tier3Minimal
        && !analysis.analysis_recommendation.should_generate_insights)
}
