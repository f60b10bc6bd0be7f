pub mod assessment;
pub mod form;
pub mod message;
pub mod tier;

pub use assessment::{
    ActionPlanRecord, CbtAssessment, ChallengeQuestionRecord, ChangeDirection, CoreBeliefRecord,
    EmotionComparisonEntry, EmotionKind, EmotionPair, EmotionSet, RationalThoughtRecord,
    SCHEMA_VERSION, SchemaModeRecord, SituationRecord, ThoughtRecord, compare_emotion_sets,
    json_schema,
};
pub use form::{CANONICAL_SCHEMA_MODES, FormSchemaMode, ParsedCbtForm};
pub use message::ChatMessage;
pub use tier::{
    AnalysisDepth, AnalysisRecommendation, ContentTier, ContentTierAnalysis, SchemaReflectionDepth,
};
