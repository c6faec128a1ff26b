use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;
use crate::fields::Locale;

/// Gantt-style project timeline for the terminal.
/// Tasks come from a JSON file (--data) or a built-in project (--project).
#[derive(Parser)]
#[command(name = "gantt", version, about = "Project timeline viewer")]
pub struct Cli {
    /// JSON file with the task list; "-" reads standard input.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Name of a built-in project (see `gantt projects`).
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// JSON file with team colour overrides. Defaults to ~/.gantt/colors.json.
    #[arg(long, global = true)]
    pub colors: Option<PathBuf>,

    /// Language for month names and labels.
    #[arg(long, global = true, value_enum, default_value_t = Locale::Es)]
    pub locale: Locale,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
