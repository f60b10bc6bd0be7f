use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::RuntimePaths;
use crate::ingest;
use crate::router;
use crate::summary;

#[derive(Debug, Clone, Args)]
pub struct SummarizeArgs {
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,

    /// Also write the digest under <out_dir>/summary/summary.md.
    #[arg(long, default_value_t = false)]
    pub write: bool,
}

pub fn run(args: &SummarizeArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    println!("summarize: start transcript={}", args.transcript.display());

    let loaded = ingest::load_transcript(&args.transcript)?;
    for warning in &loaded.warnings {
        eprintln!("summarize: transcript warning {warning}");
    }

    let assessment = router::parse_all_cbt_data(&loaded.messages);
    let digest = summary::generate_cbt_summary(&assessment);

    if digest.is_empty() {
        println!("summarize: no structured data found");
    } else {
        println!("{digest}");
    }

    if args.write {
        let path = runtime_paths.out_dir.join("summary").join("summary.md");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("failed to create summary artifact directory")?;
        }
        std::fs::write(&path, &digest).context("failed to write summary artifact")?;
        println!("summarize: complete summary={}", path.display());
    }

    Ok(())
}
