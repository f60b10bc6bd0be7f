use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::RuntimePaths;
use crate::ingest;
use crate::tier;

#[derive(Debug, Clone, Args)]
pub struct TierArgs {
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,
}

pub fn run(args: &TierArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    println!(
        "tier: start transcript={} out_dir={}",
        args.transcript.display(),
        runtime_paths.out_dir.display()
    );

    let loaded = ingest::load_transcript(&args.transcript)?;
    for warning in &loaded.warnings {
        eprintln!("tier: transcript warning {warning}");
    }

    let analysis = tier::analyze_content_tier(&loaded.messages);
    let artifacts = tier::build_artifact_layout(&runtime_paths.out_dir);
    tier::write_analysis_artifact(&artifacts.analysis_json, &analysis)?;

    println!(
        "tier: complete tier={} confidence={} triggers={} depth={} analysis={}",
        analysis.tier.as_str(),
        analysis.confidence,
        analysis.triggers.len(),
        analysis.schema_reflection_depth.as_str(),
        artifacts.analysis_json.display()
    );

    Ok(())
}
