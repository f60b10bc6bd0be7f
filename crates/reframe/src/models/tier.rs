use serde::{Deserialize, Serialize};

/// Three-level classification of how much structured therapeutic
/// signal a conversation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentTier {
    #[serde(rename = "tier1_premium")]
    Tier1Premium,
    #[serde(rename = "tier2_standard")]
    Tier2Standard,
    #[serde(rename = "tier3_minimal")]
    Tier3Minimal,
}

impl ContentTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tier1Premium => "tier1_premium",
            Self::Tier2Standard => "tier2_standard",
            Self::Tier3Minimal => "tier3_minimal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaReflectionDepth {
    None,
    Minimal,
    Moderate,
    Comprehensive,
}

impl SchemaReflectionDepth {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minimal => "minimal",
            Self::Moderate => "moderate",
            Self::Comprehensive => "comprehensive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    Full,
    Standard,
    Minimal,
}

/// Per-tier policy telling the downstream report generator how deep
/// an analysis it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecommendation {
    pub analysis_depth: AnalysisDepth,
    pub should_analyze_cognitive_distortions: bool,
    pub should_analyze_schemas: bool,
    pub should_generate_action_items: bool,
    pub should_generate_insights: bool,
    pub prioritize_user_self_assessment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTierAnalysis {
    pub tier: ContentTier,
    pub confidence: u8,
    pub triggers: Vec<String>,
    pub analysis_recommendation: AnalysisRecommendation,
    pub user_self_assessment_present: bool,
    pub schema_reflection_depth: SchemaReflectionDepth,
}
