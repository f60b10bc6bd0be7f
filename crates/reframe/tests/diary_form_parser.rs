use reframe::extractors::diary::{parse_cbt_from_markdown, parse_diary_document};
use reframe::models::message::ChatMessage;

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/diary")
        .join(name);
    std::fs::read_to_string(path).expect("fixture readable")
}

#[test]
fn reconstructs_a_complete_diary_entry() {
    let form = parse_diary_document(&fixture("complete_entry.md"));

    assert!(form.is_complete);
    assert!(form.parsing_errors.is_empty());
    assert_eq!(form.date, "2024-01-15");
    assert_eq!(
        form.situation,
        "Argument with my sister about our father's care."
    );

    assert_eq!(form.initial_emotions.anger, 8);
    assert_eq!(form.initial_emotions.guilt, 6);
    assert_eq!(form.final_emotions.anger, 4);

    assert_eq!(form.automatic_thoughts.len(), 2);
    assert_eq!(
        form.automatic_thoughts[0],
        "I am the only one who takes responsibility"
    );
    assert_eq!(form.thought_credibility, 8);
    assert_eq!(form.rational_thoughts.len(), 1);
    assert!(form.core_belief.starts_with("When I feel ignored"));
}

#[test]
fn checkbox_list_updates_the_seeded_mode_vocabulary() {
    let form = parse_diary_document(&fixture("complete_entry.md"));

    let angry = form
        .schema_modes
        .iter()
        .find(|mode| mode.name == "Angry Child")
        .expect("seeded mode present");
    assert!(angry.selected);
    assert_eq!(angry.intensity, 7);

    let healthy = form
        .schema_modes
        .iter()
        .find(|mode| mode.name == "Healthy Adult")
        .expect("seeded mode present");
    assert!(!healthy.selected);

    // Unticked seeded modes stay in the list, unselected.
    assert!(
        form.schema_modes
            .iter()
            .any(|mode| mode.name == "Detached Protector" && !mode.selected)
    );
}

#[test]
fn reflection_block_requires_its_header_marker() {
    let form = parse_diary_document(&fixture("complete_entry.md"));
    assert!(form.schema_reflection.contains("angry child shows up"));

    let without_marker = parse_diary_document(
        "## Situation\n\nA note that mentions the Vulnerable Child in passing.\n",
    );
    assert!(without_marker.schema_reflection.is_empty());
}

#[test]
fn parses_both_question_tables_independently() {
    let form = parse_diary_document(&fixture("complete_entry.md"));

    assert_eq!(form.challenge_questions.len(), 2);
    assert_eq!(
        form.challenge_questions[0].question,
        "What evidence contradicts this thought?"
    );
    assert_eq!(form.additional_questions.len(), 1);
    assert_eq!(
        form.additional_questions[0].answer,
        "Share the load instead of keeping score"
    );
}

#[test]
fn partial_entry_reports_missing_fields_instead_of_failing() {
    let form = parse_diary_document(&fixture("partial_entry.md"));

    assert!(!form.is_complete);
    assert!(form.missing_fields.contains(&"situation".to_string()));
    assert!(form.missing_fields.contains(&"date".to_string()));
    // Emotions were rated, so they are not missing.
    assert!(!form.missing_fields.contains(&"emotions".to_string()));
}

#[test]
fn partial_entry_accumulates_parsing_errors() {
    let form = parse_diary_document(&fixture("partial_entry.md"));

    assert!(
        form.parsing_errors
            .iter()
            .any(|error| error.contains("out of range"))
    );
    assert!(
        form.parsing_errors
            .iter()
            .any(|error| error.contains("malformed challenge questions row"))
    );
    // The out-of-range rating is clamped, not dropped.
    assert_eq!(form.initial_emotions.anxiety, 10);
}

#[test]
fn unparseable_dates_are_kept_verbatim_with_an_error() {
    let form = parse_diary_document("**Date**: last tuesday\n\n## Situation\n\nA note.\n");

    assert_eq!(form.date, "last tuesday");
    assert!(
        form.parsing_errors
            .iter()
            .any(|error| error.contains("not recognized"))
    );
}

#[test]
fn empty_document_yields_a_defaulted_incomplete_form() {
    let form = parse_diary_document("");

    assert!(!form.is_complete);
    assert!(form.situation.is_empty());
    assert!(form.automatic_thoughts.is_empty());
    assert!(form.schema_modes.iter().all(|mode| !mode.selected));
    assert!(form.missing_fields.contains(&"situation".to_string()));
    assert!(form.missing_fields.contains(&"emotions".to_string()));
}

#[test]
fn message_list_entrypoint_joins_bodies_in_order() {
    let messages = vec![
        ChatMessage::user("**Date**: 03.11.2023\n\n## Situation\n\nSplit across messages."),
        ChatMessage::user("## Emotions at the Start\n\n- Sadness: 6/10"),
    ];

    let form = parse_cbt_from_markdown(&messages);
    assert_eq!(form.date, "2023-11-03");
    assert!(form.is_complete);
    assert_eq!(form.initial_emotions.sadness, 6);
}

#[test]
fn form_maps_onto_the_partial_assessment_shape() {
    let form = parse_diary_document(&fixture("complete_entry.md"));
    let assessment = form.to_assessment();

    let situation = assessment.situation.expect("situation mapped");
    assert_eq!(situation.date, "2024-01-15");

    let emotions = assessment.emotions.expect("emotions mapped");
    assert_eq!(emotions.initial.anger, 8);
    assert!(emotions.r#final.is_some());

    // Main and additional tables concatenate in order.
    assert_eq!(
        assessment
            .challenge_questions
            .expect("questions mapped")
            .len(),
        3
    );
    assert_eq!(
        assessment.schema_modes.expect("modes mapped").len(),
        2
    );
    assert!(assessment.emotion_comparison.is_some());
}
