use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::ingest;
use crate::router;
use crate::utils::content;

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Detection-only view of a transcript: which wire format is present
/// and which sections it carries. Writes no artifacts.
pub fn run(args: &InspectArgs) -> Result<()> {
    let loaded = ingest::load_transcript(&args.transcript)?;
    let detected = router::has_cbt_data(&loaded.messages);
    let outcome = router::extract_with_provenance(&loaded.messages);

    if args.json {
        let document = json!({
            "transcript": args.transcript.display().to_string(),
            "messages": loaded.messages.len(),
            "has_cbt_data": detected,
            "source_format": outcome.source_format.as_str(),
            "sections_found": outcome.sections_found,
            "warnings": loaded
                .warnings
                .iter()
                .chain(&outcome.warnings)
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!(
        "inspect: transcript={} messages={} has_cbt_data={}",
        args.transcript.display(),
        loaded.messages.len(),
        detected
    );
    println!(
        "inspect: format={} sections=[{}]",
        outcome.source_format.as_str(),
        outcome.sections_found.join(", ")
    );
    for warning in loaded.warnings.iter().chain(&outcome.warnings) {
        println!("inspect: warning {warning}");
    }
    for (index, message) in loaded.messages.iter().enumerate() {
        println!(
            "inspect: message {} role={} preview={}",
            index + 1,
            message.role,
            content::preview(&message.content, content::PREVIEW_MAX_CHARS)
        );
    }

    Ok(())
}
