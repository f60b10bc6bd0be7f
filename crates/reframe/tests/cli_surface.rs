use std::path::Path;

use clap::Parser;
use reframe::cli::app::{Cli, Command};

#[test]
fn parses_global_runtime_flags_for_extract() {
    let cli = Cli::parse_from([
        "reframe",
        "--home-dir",
        "/home/tester",
        "--cwd",
        "/work/session",
        "--out-dir",
        "/tmp/reframe-out",
        "extract",
        "transcript.json",
    ]);

    assert_eq!(
        cli.runtime.home_dir.as_deref(),
        Some(Path::new("/home/tester"))
    );
    assert_eq!(cli.runtime.cwd.as_deref(), Some(Path::new("/work/session")));
    assert_eq!(
        cli.runtime.out_dir.as_deref(),
        Some(Path::new("/tmp/reframe-out"))
    );

    match cli.command {
        Command::Extract(args) => {
            assert_eq!(args.transcript, Path::new("transcript.json"));
        }
        other => panic!("expected extract command, got {other:?}"),
    }
}

#[test]
fn parses_tier_command() {
    let cli = Cli::parse_from(["reframe", "tier", "session.jsonl"]);

    match cli.command {
        Command::Tier(args) => {
            assert_eq!(args.transcript, Path::new("session.jsonl"));
        }
        other => panic!("expected tier command, got {other:?}"),
    }
}

#[test]
fn parses_summarize_write_flag() {
    let cli = Cli::parse_from(["reframe", "summarize", "session.json", "--write"]);

    match cli.command {
        Command::Summarize(args) => {
            assert!(args.write);
            assert_eq!(args.transcript, Path::new("session.json"));
        }
        other => panic!("expected summarize command, got {other:?}"),
    }
}

#[test]
fn parses_validate_strict_flag() {
    let cli = Cli::parse_from(["reframe", "validate", "entry.md", "--strict"]);

    match cli.command {
        Command::Validate(args) => {
            assert!(args.strict);
            assert_eq!(args.diary, Path::new("entry.md"));
        }
        other => panic!("expected validate command, got {other:?}"),
    }
}

#[test]
fn parses_inspect_json_flag() {
    let cli = Cli::parse_from(["reframe", "inspect", "session.json", "--json"]);

    match cli.command {
        Command::Inspect(args) => {
            assert!(args.json);
            assert_eq!(args.transcript, Path::new("session.json"));
        }
        other => panic!("expected inspect command, got {other:?}"),
    }
}
