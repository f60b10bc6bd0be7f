use reframe::extractors::diary::parse_diary_document;
use reframe::validate::{
    FormValidationReport, IssueSeverity, ValidationMode, ValidationStatus, validate_form,
};

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/diary")
        .join(name);
    std::fs::read_to_string(path).expect("fixture readable")
}

#[test]
fn complete_entry_passes_baseline_validation() {
    let form = parse_diary_document(&fixture("complete_entry.md"));
    let report = validate_form(&form, ValidationMode::Baseline);

    assert_eq!(report.status, ValidationStatus::Pass);
    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 0);
    assert!(report.is_complete);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.quality_scorecard.situation_score, 100);
    assert_eq!(report.quality_scorecard.cognitive_score, 100);
}

#[test]
fn partial_entry_fails_on_required_fields() {
    let form = parse_diary_document(&fixture("partial_entry.md"));
    let report = validate_form(&form, ValidationMode::Baseline);

    assert_eq!(report.status, ValidationStatus::Fail);
    assert!(report.errors >= 1);
    assert_eq!(report.interpreted_exit_code, 2);
    assert!(!report.is_complete);
    assert!(
        report
            .issues
            .iter()
            .any(|issue| issue.field == "situation" && issue.severity == IssueSeverity::Error)
    );
    assert_eq!(report.quality_scorecard.situation_score, 0);
    assert!(report.quality_scorecard.overall_score < 20);
    assert_eq!(report.quality_scorecard.weakest_dimensions.len(), 2);
}

#[test]
fn parsing_errors_surface_as_warnings() {
    let form = parse_diary_document(&fixture("partial_entry.md"));
    let report = validate_form(&form, ValidationMode::Baseline);

    assert!(
        report
            .issues
            .iter()
            .any(|issue| issue.field == "parsing"
                && issue.severity == IssueSeverity::Warning
                && issue.detail.contains("malformed"))
    );
}

#[test]
fn strict_mode_promotes_optional_misses_to_errors() {
    let form = parse_diary_document(
        "## Situation\n\nA short note.\n\n## Emotions at the Start\n\n- Anger: 4/10\n",
    );

    let baseline = validate_form(&form, ValidationMode::Baseline);
    assert_eq!(baseline.status, ValidationStatus::Warn);
    assert_eq!(baseline.errors, 0);
    assert!(baseline.warnings >= 5);

    let strict = validate_form(&form, ValidationMode::Strict);
    assert_eq!(strict.status, ValidationStatus::Fail);
    assert!(strict.errors >= 5);
    assert_eq!(strict.interpreted_exit_code, 2);
}

#[test]
fn reports_round_trip_through_serde() {
    let form = parse_diary_document(&fixture("complete_entry.md"));
    let report = validate_form(&form, ValidationMode::Strict);

    let encoded = serde_json::to_string(&report).expect("report serializes");
    let decoded: FormValidationReport =
        serde_json::from_str(&encoded).expect("report deserializes");
    assert_eq!(decoded, report);
    assert_eq!(decoded.schema_version, "reframe.form-report.v1");
}
