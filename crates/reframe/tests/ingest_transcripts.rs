use reframe::ingest::{load_transcript, parse_transcript_json, parse_transcript_jsonl};

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/transcripts")
        .join(name)
}

#[test]
fn loads_a_json_array_transcript() {
    let loaded = load_transcript(&fixture_path("card_session.json")).expect("fixture readable");

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.messages.len(), 2);
    assert_eq!(loaded.messages[0].role, "user");
    assert!(loaded.messages[1].content.contains("CBT_SUMMARY_CARD"));
}

#[test]
fn flattens_nested_content_blocks_and_defaults_missing_roles() {
    let loaded = load_transcript(&fixture_path("nested_content.json")).expect("fixture readable");

    assert_eq!(loaded.messages.len(), 2);
    assert_eq!(
        loaded.messages[0].content,
        "First part of the message.\nSecond part."
    );
    assert_eq!(loaded.messages[1].role, "user");
    assert!(
        loaded
            .warnings
            .iter()
            .any(|warning| warning.contains("missing `role`"))
    );
}

#[test]
fn jsonl_rows_fail_independently() {
    let loaded = load_transcript(&fixture_path("malformed.jsonl")).expect("fixture readable");

    assert_eq!(loaded.messages.len(), 2);
    assert!(
        loaded
            .warnings
            .iter()
            .any(|warning| warning.contains("line 2") && warning.contains("invalid JSON"))
    );
    assert!(
        loaded
            .warnings
            .iter()
            .any(|warning| warning.contains("line 3") && warning.contains("missing or empty `content`"))
    );
}

#[test]
fn non_array_documents_warn_instead_of_failing() {
    let result = parse_transcript_json(r#"{"role":"user","content":"not a list"}"#);
    assert!(result.messages.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("must be an array"));

    let result = parse_transcript_json("not json at all");
    assert!(result.messages.is_empty());
    assert!(result.warnings[0].contains("invalid JSON transcript"));
}

#[test]
fn non_object_rows_are_skipped_with_a_warning() {
    let result = parse_transcript_jsonl("42\n{\"role\":\"user\",\"content\":\"kept\"}\n");
    assert_eq!(result.messages.len(), 1);
    assert!(
        result
            .warnings
            .iter()
            .any(|warning| warning.contains("must be a JSON object"))
    );
}

#[test]
fn missing_files_are_runtime_errors() {
    let error = load_transcript(&fixture_path("does_not_exist.json"))
        .expect_err("missing file must fail");
    assert!(error.to_string().contains("failed to read transcript file"));
}
