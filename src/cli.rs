use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Gamified, file-backed task manager CLI.
/// Storage defaults to ~/.tickit or a directory passed via --dir.
#[derive(Parser)]
#[command(name = "tickit", version, about = "Gamified daily task manager")]
pub struct Cli {
    /// Directory holding tickit-tasks.json and tickit-user.json.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
