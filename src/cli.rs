//! Command-line argument parsing for the workspace driver
//!
//! Supports:
//! - Replaying a script of URL changes, resizes, bridge messages and gestures
//! - Per-user layout storage
//! - Starting fresh without restoring the stored layout

use clap::Parser;
use std::path::PathBuf;

/// Headless driver for the multi-panel tab workspace
#[derive(Parser, Debug)]
#[command(
    name = "paneframe",
    version,
    about = "Replay workspace events and print the resulting layout"
)]
pub struct CliArgs {
    /// JSON-lines file of events to replay
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// User whose layout is restored and persisted
    #[arg(short, long, default_value = "default")]
    pub user: String,

    /// Initial viewport width in CSS pixels
    #[arg(short, long, value_name = "PX")]
    pub width: Option<u32>,

    /// Config file (defaults to ~/.config/paneframe/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for stored layouts (defaults to ~/.config/paneframe/layouts)
    #[arg(long, value_name = "DIR")]
    pub layouts_dir: Option<PathBuf>,

    /// Skip restoring the stored layout
    #[arg(short, long)]
    pub fresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["paneframe"]);
        assert_eq!(args.user, "default");
        assert!(args.script.is_none());
        assert!(!args.fresh);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::parse_from([
            "paneframe",
            "--script",
            "events.jsonl",
            "--user",
            "alice",
            "--width",
            "800",
            "--fresh",
        ]);
        assert_eq!(args.script, Some(PathBuf::from("events.jsonl")));
        assert_eq!(args.user, "alice");
        assert_eq!(args.width, Some(800));
        assert!(args.fresh);
    }
}
