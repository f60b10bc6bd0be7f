use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    extract::ExtractArgs, inspect::InspectArgs, summarize::SummarizeArgs, tier::TierArgs,
    validate::ValidateArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "reframe",
    version,
    about = "CBT transcript extraction and content-tier classification"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Extract(ExtractArgs),
    Tier(TierArgs),
    Summarize(SummarizeArgs),
    Validate(ValidateArgs),
    Inspect(InspectArgs),
}
