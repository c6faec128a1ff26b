//! # gantt - Project Timeline
//!
//! Renders a Gantt-style timeline from a list of tasks grouped by team, in the
//! terminal or as plain-text / JSON layout dumps.
//!
//! ## How a chart is laid out
//!
//! - **Window**: the padded date span of every task, at least two weeks long.
//! It is computed from the unfiltered list, so filtering never rescales the axis.
//! - **Intervals**: axis ticks by week, month, quarter or semester.
//! - **Geometry**: each bar's left offset and width as a percentage of the window.
//! - **Lanes**: overlapping tasks of one team are stacked into rows, first fit.
//! - **Today marker**: today's position on the same scale.
//!
//! ## Quick Start
//!
//! ```bash
//! # Pick a built-in project from the menu
//! gantt
//!
//! # Open your own task list, zoomed to months
//! gantt --data tasks.json ui --zoom month
//!
//! # Dump the layout as JSON
//! gantt --project gestores layout --format json
//!
//! # Check a task list before sharing it
//! gantt --data tasks.json validate
//! ```
//!
//! Task lists are JSON arrays of
//! `{ id, title, startDate, endDate, team, description, progress, responsable? }`
//! with dates as `YYYY-MM-DD`. Team colours can be overridden in
//! `~/.gantt/colors.json`.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub mod catalog;
pub mod cli;
pub mod cmd;
pub mod dates;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod intervals;
pub mod lanes;
pub mod layout;
pub mod marker;
pub mod source;
pub mod task;
pub mod theme;
pub mod window;
pub mod tui {
    pub mod app;
    pub mod chart;
    pub mod colors;
    pub mod enums;
    pub mod menu;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use source::TaskSource;
use theme::TeamColors;

/// Default filter for the verbosity flags.
///
/// The UI owns the terminal, so it logs errors only unless asked for more.
fn default_log_level(verbose: u8, quiet: u8, interactive: bool) -> &'static str {
    if quiet >= 2 {
        "off"
    } else if quiet == 1 || (interactive && verbose == 0) {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    }
}

/// Log file for UI sessions: `<dir>/gantt.log`, appended to.
fn ui_log_appender(dir: &Path) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("gantt")
        .filename_suffix("log")
        .build(dir)
        .ok()
}

/// Set up `tracing`. `RUST_LOG` wins over the verbosity flags.
///
/// Command output goes to stderr. The UI draws on the alternate screen, so
/// its events go to `~/.gantt/gantt.log` instead, and nowhere if that file
/// cannot be opened.
fn init_tracing(verbose: u8, quiet: u8, interactive: bool) {
    let default_level = default_log_level(verbose, quiet, interactive);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    let init_result = if interactive {
        let Some(appender) = ui_log_appender(&gantt_dir()) else {
            return;
        };
        builder.with_writer(appender).with_ansi(false).try_init()
    } else {
        builder
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init()
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

/// `~/.gantt`, home of the colour file and the UI log.
fn gantt_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".gantt")
}

/// Location of the default colour file: `~/.gantt/colors.json`.
fn default_colors_path() -> PathBuf {
    gantt_dir().join("colors.json")
}

fn main() {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Ui { .. }));
    init_tracing(cli.verbose, cli.quiet, interactive);

    let source = match TaskSource::from_args(cli.data.clone(), cli.project.clone()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    // Commands that need no task list.
    match &cli.command {
        Some(Commands::Projects { format }) => {
            cmd_projects(*format);
            return;
        },
        Some(Commands::Example) => {
            cmd_example();
            return;
        },
        Some(Commands::Completions { shell }) => {
            cmd_completions(*shell);
            return;
        },
        Some(Commands::Validate) => {
            let Some(source) = source else {
                eprintln!("Error: validate needs --data or --project");
                std::process::exit(2);
            };
            cmd_validate(&source);
            return;
        },
        _ => {}
    }

    let colors_path = cli.colors.clone().unwrap_or_else(default_colors_path);
    let colors = match TeamColors::load(&colors_path) {
        Ok(colors) => colors,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // The UI can start without a source and offer the project menu instead.
    match &cli.command {
        None => {
            cmd_ui(source, colors, cli.locale, ViewArgs::default());
            return;
        },
        Some(Commands::Ui { view }) => {
            cmd_ui(source, colors, cli.locale, view.clone());
            return;
        },
        _ => {}
    }

    let source = source.unwrap_or_else(|| {
        eprintln!("No task list given; showing the built-in example. Use --data or --project.");
        TaskSource::Example
    });
    let tasks = match source.load() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Error loading {}: {e}", source.name());
            std::process::exit(1);
        }
    };
    log_loaded(&source, &tasks);

    match cli.command {
        Some(Commands::Layout { view, format }) => cmd_layout(&tasks, cli.locale, &view, format),
        Some(Commands::Summary { today, format }) => cmd_summary(&tasks, cli.locale, today, format),
        Some(Commands::Intervals { view, format }) => cmd_intervals(&tasks, cli.locale, &view, format),
        Some(Commands::Lanes { view, format }) => cmd_lanes(&tasks, cli.locale, &view, format),
        None | Some(Commands::Ui { .. }) => unreachable!("UI command handled above"),
        Some(Commands::Validate)
        | Some(Commands::Projects { .. })
        | Some(Commands::Example)
        | Some(Commands::Completions { .. }) => unreachable!("handled before loading tasks"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ui_defaults_to_errors_only() {
        assert_eq!(default_log_level(0, 0, true), "error");
        assert_eq!(default_log_level(0, 0, false), "warn");
        assert_eq!(default_log_level(2, 0, true), "debug");
        assert_eq!(default_log_level(3, 0, false), "trace");
        assert_eq!(default_log_level(1, 2, true), "off");
    }

    #[test]
    fn test_ui_log_goes_to_file_in_gantt_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join(".gantt");
        let mut appender = ui_log_appender(&log_dir).unwrap();
        writeln!(appender, "opening timeline").unwrap();
        appender.flush().unwrap();

        let written = std::fs::read_to_string(log_dir.join("gantt.log")).unwrap();
        assert!(written.contains("opening timeline"));
    }
}
