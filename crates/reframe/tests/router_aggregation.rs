use reframe::extractors::SourceFormat;
use reframe::ingest;
use reframe::models::assessment::ChangeDirection;
use reframe::models::message::ChatMessage;
use reframe::router::{extract_with_provenance, has_cbt_data, parse_all_cbt_data};

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/transcripts")
        .join(name)
}

fn fixture_messages(name: &str) -> Vec<ChatMessage> {
    let loaded = ingest::load_transcript(&fixture_path(name)).expect("fixture readable");
    assert!(
        loaded.warnings.is_empty(),
        "unexpected fixture warnings: {:?}",
        loaded.warnings
    );
    loaded.messages
}

#[test]
fn detects_card_and_markdown_formats() {
    assert!(has_cbt_data(&[ChatMessage::assistant(
        r#"<!-- CBT_SUMMARY_CARD:{"situation":"test"} -->"#,
    )]));
    assert!(has_cbt_data(&[ChatMessage::assistant(
        "**CBT Session - Emotion Assessment**\n\u{2022} **Fear**: 2/10",
    )]));
    assert!(!has_cbt_data(&[ChatMessage::user("Hello, how are you?")]));
    assert!(!has_cbt_data(&[]));
}

#[test]
fn card_format_supersedes_markdown_sections() {
    let messages = vec![
        ChatMessage::assistant(
            "**CBT Session - Situation Analysis**\n\u{1F4DD} **Description**: From the markdown path",
        ),
        ChatMessage::assistant(
            r#"<!-- CBT_SUMMARY_CARD:{"situation":"From the card path","date":"2024-02-02"} -->"#,
        ),
    ];

    let outcome = extract_with_provenance(&messages);
    assert_eq!(outcome.source_format, SourceFormat::Card);
    assert_eq!(
        outcome.assessment.situation.expect("situation mapped").description,
        "From the card path"
    );
}

#[test]
fn malformed_card_falls_back_to_markdown() {
    let messages = vec![
        ChatMessage::assistant("<!-- CBT_SUMMARY_CARD:{broken json} -->"),
        ChatMessage::assistant(
            "**CBT Session - Situation Analysis**\n\u{1F4DD} **Description**: Markdown fallback",
        ),
    ];

    let outcome = extract_with_provenance(&messages);
    assert_eq!(outcome.source_format, SourceFormat::Markdown);
    assert_eq!(
        outcome.assessment.situation.expect("situation mapped").description,
        "Markdown fallback"
    );
}

#[test]
fn first_section_wins_for_repeated_kinds() {
    let messages = vec![
        ChatMessage::assistant(
            "**CBT Session - Situation Analysis**\n\u{1F4DD} **Description**: First description",
        ),
        ChatMessage::assistant(
            "**CBT Session - Situation Analysis**\n\u{1F4DD} **Description**: Second description",
        ),
    ];

    let assessment = parse_all_cbt_data(&messages);
    assert_eq!(
        assessment.situation.expect("situation mapped").description,
        "First description"
    );
}

#[test]
fn second_emotion_section_becomes_the_final_set() {
    let messages = vec![
        ChatMessage::assistant(
            "**CBT Session - Emotion Assessment**\n\u{2022} **Anxiety**: 8/10",
        ),
        ChatMessage::assistant(
            "**CBT Session - Emotion Assessment**\n\u{2022} **Anxiety**: 3/10",
        ),
    ];

    let assessment = parse_all_cbt_data(&messages);
    let emotions = assessment.emotions.expect("emotions mapped");
    assert_eq!(emotions.initial.anxiety, 8);
    assert_eq!(emotions.r#final.expect("final set attached").anxiety, 3);

    let comparison = assessment.emotion_comparison.expect("comparison derived");
    assert_eq!(comparison.len(), 1);
    assert_eq!(comparison[0].emotion, "Anxiety");
    assert_eq!(comparison[0].direction, ChangeDirection::Decreased);
    assert_eq!(comparison[0].change, 5);
}

#[test]
fn aggregates_a_full_markdown_session_across_messages() {
    let messages = fixture_messages("markdown_session.jsonl");
    let outcome = extract_with_provenance(&messages);

    assert_eq!(outcome.source_format, SourceFormat::Markdown);
    assert!(outcome.warnings.is_empty());

    let assessment = &outcome.assessment;
    let situation = assessment.situation.as_ref().expect("situation mapped");
    assert_eq!(situation.date, "2024-03-08");

    let emotions = assessment.emotions.as_ref().expect("emotions mapped");
    assert_eq!(emotions.initial.anger, 7);
    assert_eq!(emotions.initial.other, "Jealousy");
    let r#final = emotions.r#final.as_ref().expect("final set attached");
    assert_eq!(r#final.anger, 3);

    assert_eq!(assessment.thoughts.as_ref().expect("thoughts mapped").len(), 2);
    assert_eq!(
        assessment.core_belief.as_ref().expect("belief mapped").credibility,
        7
    );
    assert_eq!(
        assessment
            .challenge_questions
            .as_ref()
            .expect("questions mapped")
            .len(),
        2
    );
    assert_eq!(
        assessment
            .rational_thoughts
            .as_ref()
            .expect("rational mapped")
            .len(),
        1
    );
    assert_eq!(
        assessment.schema_modes.as_ref().expect("modes mapped").len(),
        2
    );
    let plan = assessment.action_plan.as_ref().expect("plan mapped");
    assert_eq!(plan.new_behaviors.len(), 2);

    // Derived from the initial/final pair: fear 4→2, anger 7→3, sadness 5→2.
    let comparison = assessment
        .emotion_comparison
        .as_ref()
        .expect("comparison derived");
    assert_eq!(comparison.len(), 3);
    assert!(
        comparison
            .iter()
            .all(|entry| entry.direction == ChangeDirection::Decreased)
    );
}

#[test]
fn extraction_is_idempotent() {
    let messages = fixture_messages("markdown_session.jsonl");
    assert_eq!(parse_all_cbt_data(&messages), parse_all_cbt_data(&messages));

    let card = fixture_messages("card_session.json");
    assert_eq!(parse_all_cbt_data(&card), parse_all_cbt_data(&card));
}

#[test]
fn card_fixture_round_trips_through_the_router() {
    let messages = fixture_messages("card_session.json");
    let outcome = extract_with_provenance(&messages);

    assert_eq!(outcome.source_format, SourceFormat::Card);
    assert!(outcome.sections_found.contains(&"situation"));
    assert!(outcome.sections_found.contains(&"action_plan"));

    let emotions = outcome.assessment.emotions.expect("emotions mapped");
    assert_eq!(emotions.initial.anxiety, 8);
    assert_eq!(emotions.r#final.expect("final set attached").anxiety, 4);
}

#[test]
fn plain_conversation_yields_an_empty_assessment() {
    let messages = vec![
        ChatMessage::user("Rough week but nothing structured."),
        ChatMessage::assistant("Want to talk through it?"),
    ];

    let outcome = extract_with_provenance(&messages);
    assert_eq!(outcome.source_format, SourceFormat::None);
    assert!(outcome.assessment.is_empty());
    assert!(outcome.sections_found.is_empty());
}
