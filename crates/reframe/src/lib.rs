#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod extractors;
pub mod ingest;
pub mod models;
pub mod router;
pub mod summary;
pub mod tier;
pub mod utils;
pub mod validate;

pub use cli::app::{Cli, Command};
pub use extractors::diary::parse_cbt_from_markdown;
pub use router::{has_cbt_data, parse_all_cbt_data};
pub use summary::{generate_cbt_summary, meets_analysis_threshold};
pub use tier::analyze_content_tier;
