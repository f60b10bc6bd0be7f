use reframe::models::message::ChatMessage;
use reframe::models::tier::{AnalysisDepth, ContentTier, SchemaReflectionDepth};
use reframe::tier::analyze_content_tier;

#[test]
fn empty_user_text_is_minimal_with_full_confidence() {
    let analysis = analyze_content_tier(&[]);
    assert_eq!(analysis.tier, ContentTier::Tier3Minimal);
    assert_eq!(analysis.confidence, 100);
    assert!(analysis.triggers.is_empty());
    assert_eq!(analysis.schema_reflection_depth, SchemaReflectionDepth::None);
}

#[test]
fn assistant_only_transcripts_classify_like_empty_ones() {
    let messages = vec![ChatMessage::assistant(
        "**CBT Session - Emotion Assessment**\n\u{2022} **Fear**: 7/10",
    )];
    let analysis = analyze_content_tier(&messages);
    assert_eq!(analysis.tier, ContentTier::Tier3Minimal);
    assert_eq!(analysis.confidence, 100);
}

#[test]
fn structured_cbt_content_is_premium() {
    let messages = vec![ChatMessage::user(
        "**CBT Session - Emotion Assessment**\n\u{2022} **Fear**: 7/10\n\u{2022} **Anxiety**: 8/10",
    )];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier1Premium);
    assert_eq!(analysis.confidence, 100);
    assert!(
        analysis
            .triggers
            .contains(&"strong_cbt_signature".to_string())
    );
    assert!(analysis.user_self_assessment_present);
    assert_eq!(
        analysis.analysis_recommendation.analysis_depth,
        AnalysisDepth::Full
    );
    assert!(analysis.analysis_recommendation.should_analyze_schemas);
}

#[test]
fn schema_reflection_promotes_to_premium() {
    let messages = vec![ChatMessage::user(
        "In my schema reflection I noticed the Vulnerable Child and the Detached Protector taking over.",
    )];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier1Premium);
    assert_eq!(analysis.confidence, 93);
    assert_eq!(
        analysis.triggers,
        vec!["schema_reflection_present".to_string()]
    );
    assert_eq!(
        analysis.schema_reflection_depth,
        SchemaReflectionDepth::Moderate
    );
}

#[test]
fn emotional_free_text_is_standard_with_rebounded_confidence() {
    let messages = vec![ChatMessage::user(
        "I feel really anxious about work lately. My manager keeps criticizing me and I \
         worry I might lose my job. I can't sleep and feel overwhelmed.",
    )];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier2Standard);
    // 65 + 10 + 4 + 5 = 84, re-bounded to the mid-intensity cap.
    assert_eq!(analysis.confidence, 78);
    assert!(
        analysis
            .triggers
            .contains(&"high_therapeutic_relevance".to_string())
    );
    assert!(analysis.analysis_recommendation.should_generate_insights);
    assert!(
        analysis
            .analysis_recommendation
            .should_analyze_cognitive_distortions
    );
}

#[test]
fn acute_distress_floors_standard_confidence() {
    let messages = vec![ChatMessage::user(
        "I am completely overwhelmed and desperate. I can't cope anymore!! My heart racing, \
         panic attack at night, can't sleep, crying all the time, no appetite.",
    )];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier2Standard);
    assert!(analysis.confidence >= 81);
    assert!(
        analysis
            .triggers
            .contains(&"multiple_stress_indicators".to_string())
    );
    assert!(analysis.analysis_recommendation.should_generate_action_items);
    assert!(analysis.analysis_recommendation.should_analyze_schemas);
}

#[test]
fn organizational_requests_are_minimal() {
    let messages = vec![ChatMessage::user(
        "Hi, can you reschedule my appointment to Friday?",
    )];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier3Minimal);
    assert_eq!(analysis.confidence, 94);
    assert!(analysis.triggers.contains(&"brief_request".to_string()));
    assert!(analysis.triggers.contains(&"explicit_exclusion".to_string()));
}

#[test]
fn a_self_rating_keeps_content_out_of_the_minimal_tier() {
    let messages = vec![ChatMessage::user("I'd say my mood is 3/10 today")];
    let analysis = analyze_content_tier(&messages);

    assert_eq!(analysis.tier, ContentTier::Tier2Standard);
    assert_eq!(analysis.confidence, 72);
    assert!(analysis.user_self_assessment_present);
    assert!(
        analysis
            .triggers
            .contains(&"quantified_self_assessment".to_string())
    );
    assert!(
        analysis
            .analysis_recommendation
            .prioritize_user_self_assessment
    );
}

#[test]
fn classification_is_deterministic() {
    let messages = vec![ChatMessage::user(
        "I feel really anxious about work lately and I can't sleep.",
    )];
    assert_eq!(
        analyze_content_tier(&messages),
        analyze_content_tier(&messages)
    );
}
