use reframe::models::message::ChatMessage;
use reframe::models::tier::ContentTier;
use reframe::summary::meets_analysis_threshold;
use reframe::tier::analyze_content_tier;

// The one safety-critical invariant of the classifier: minimal-tier
// content must never be routed into deep cognitive-distortion or
// schema analysis, no matter how its confidence was computed.
#[test]
fn minimal_tier_never_enables_deep_analysis() {
    let probes: Vec<Vec<ChatMessage>> = vec![
        vec![],
        vec![ChatMessage::user("")],
        vec![ChatMessage::user("   \n  ")],
        vec![ChatMessage::user("Hi!")],
        vec![ChatMessage::user("Thanks, see you next week.")],
        vec![ChatMessage::user("Hi, can you reschedule my appointment to Friday?")],
        vec![ChatMessage::user("Where do I update my password?")],
        vec![ChatMessage::user("Can I get an invoice for last month?")],
        vec![ChatMessage::user("Good morning")],
        vec![ChatMessage::assistant(
            "**CBT Session - Emotion Assessment**\n\u{2022} **Fear**: 7/10",
        )],
    ];

    let mut minimal_seen = 0;
    for messages in &probes {
        let analysis = analyze_content_tier(messages);
        if analysis.tier == ContentTier::Tier3Minimal {
            minimal_seen += 1;
            assert!(
                !analysis
                    .analysis_recommendation
                    .should_analyze_cognitive_distortions,
                "distortion analysis enabled for minimal tier: {messages:?}"
            );
            assert!(
                !analysis.analysis_recommendation.should_analyze_schemas,
                "schema analysis enabled for minimal tier: {messages:?}"
            );
            assert!(!analysis.analysis_recommendation.should_generate_action_items);
        }
    }

    assert!(minimal_seen >= 5, "probe set should exercise the minimal tier");
}

#[test]
fn minimal_tier_without_insights_fails_the_analysis_threshold() {
    let minimal = analyze_content_tier(&[ChatMessage::user(
        "Hi, can you reschedule my appointment to Friday?",
    )]);
    assert_eq!(minimal.tier, ContentTier::Tier3Minimal);
    assert!(!meets_analysis_threshold(&minimal));

    let standard = analyze_content_tier(&[ChatMessage::user(
        "I feel really anxious about work lately and I can't sleep.",
    )]);
    assert!(meets_analysis_threshold(&standard));
}

#[test]
fn classification_never_panics_on_hostile_input() {
    let probes = [
        "\u{0}\u{1}\u{2}",
        "<!-- CBT_SUMMARY_CARD:",
        "**CBT Session - ",
        "9999999999/10",
        "///10 10/10 10//10",
        "\u{1F9E0}\u{1F4AD}\u{2764}",
    ];

    for probe in probes {
        let _ = analyze_content_tier(&[ChatMessage::user(probe)]);
    }
}
