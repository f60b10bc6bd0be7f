use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::RuntimePaths;
use crate::ingest;
use crate::router;

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,
}

pub fn run(args: &ExtractArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    println!(
        "extract: start transcript={} out_dir={}",
        args.transcript.display(),
        runtime_paths.out_dir.display()
    );

    let loaded = ingest::load_transcript(&args.transcript)?;
    for warning in &loaded.warnings {
        eprintln!("extract: transcript warning {warning}");
    }

    let outcome = router::extract_with_provenance(&loaded.messages);
    for warning in &outcome.warnings {
        eprintln!("extract: warning {warning}");
    }

    let stats = router::build_extract_stats(&outcome, loaded.messages.len());
    let artifacts = router::build_artifact_layout(&runtime_paths.out_dir);
    router::write_assessment_artifact(&artifacts.assessment_json, &outcome.assessment)?;
    router::write_schema_artifact(&artifacts.schema_json)?;
    router::write_stats_artifact(&artifacts.stats_json, &stats)?;

    println!(
        "extract: complete format={} sections={} messages={} assessment={}",
        outcome.source_format.as_str(),
        outcome.sections_found.len(),
        loaded.messages.len(),
        artifacts.assessment_json.display()
    );

    Ok(())
}
