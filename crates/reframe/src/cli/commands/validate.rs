use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::RuntimePaths;
use crate::extractors::diary;
use crate::validate;

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    #[arg(value_name = "DIARY")]
    pub diary: PathBuf,

    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Debug)]
pub struct ValidationCommandFailure {
    pub errors: usize,
    pub first_issue: Option<String>,
}

impl std::fmt::Display for ValidationCommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "diary validation failed with {} error(s).", self.errors)?;
        if let Some(issue) = &self.first_issue {
            write!(f, " {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationCommandFailure {}

pub fn run(args: &ValidateArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let mode = if args.strict {
        validate::ValidationMode::Strict
    } else {
        validate::ValidationMode::Baseline
    };
    println!(
        "validate: start mode={} diary={} out_dir={}",
        validation_mode_key(mode),
        args.diary.display(),
        runtime_paths.out_dir.display()
    );

    let document = std::fs::read_to_string(&args.diary)
        .with_context(|| format!("failed to read diary file: {}", args.diary.display()))?;
    let form = diary::parse_diary_document(&document);
    let report = validate::validate_form(&form, mode);

    let artifacts = validate::build_artifact_layout(&runtime_paths.out_dir);
    validate::write_report_artifact(&artifacts.report_json, &report)?;
    println!(
        "validate: report status={} complete={} errors={} warnings={} report={}",
        validation_status_key(report.status),
        report.is_complete,
        report.errors,
        report.warnings,
        artifacts.report_json.display()
    );

    if report.errors > 0 {
        eprintln!(
            "validate: failed errors={} warnings={} next=inspect_report",
            report.errors, report.warnings
        );
        let first_issue = report
            .issues
            .iter()
            .find(|issue| issue.severity == validate::IssueSeverity::Error)
            .map(|issue| format!("{}: {}", issue.field, issue.detail));
        return Err(ValidationCommandFailure {
            errors: report.errors,
            first_issue,
        }
        .into());
    }

    println!(
        "validate: complete exit_code={} next=review {}",
        report.exit_code(),
        artifacts.report_json.display()
    );

    Ok(())
}

fn validation_mode_key(mode: validate::ValidationMode) -> &'static str {
    match mode {
        validate::ValidationMode::Baseline => "baseline",
        validate::ValidationMode::Strict => "strict",
    }
}

fn validation_status_key(status: validate::ValidationStatus) -> &'static str {
    match status {
        validate::ValidationStatus::Pass => "pass",
        validate::ValidationStatus::Warn => "warn",
        validate::ValidationStatus::Fail => "fail",
    }
}
