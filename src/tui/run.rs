//! TUI entry point and terminal setup.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::cmd::ViewArgs;
use crate::fields::Locale;
use crate::source::TaskSource;
use crate::theme::TeamColors;
use crate::tui::{app::App, enums::AppExit, menu::MenuApp};

/// Initialise and run the terminal user interface.
///
/// Without a source the project menu comes first. A source that fails to
/// load is an error when given on the command line, and a status message
/// when picked from the menu.
pub fn run_tui(source: Option<TaskSource>, colors: TeamColors, locale: Locale, view: ViewArgs) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_screens(&mut terminal, source, colors, locale, &view);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_screens<B: Backend>(
    terminal: &mut Terminal<B>,
    source: Option<TaskSource>,
    colors: TeamColors,
    locale: Locale,
    view: &ViewArgs,
) -> io::Result<()> {
    let started_from_menu = source.is_none();
    let mut next = source;
    let mut menu = MenuApp::new(locale);

    loop {
        let (source, from_menu) = match next.take() {
            Some(source) => (source, false),
            None => {
                menu.run(terminal)?;
                match menu.take_selection() {
                    Some(source) => (source, true),
                    None => return Ok(()),
                }
            },
        };

        let tasks = match source.load() {
            Ok(tasks) => tasks,
            Err(e) if from_menu => {
                warn!(source = %source.name(), error = %e, "could not load project");
                menu.set_status(format!("{}: {e}", source.name()));
                continue;
            },
            Err(e) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}: {e}", source.name()),
                ));
            },
        };
        info!(source = %source.name(), tasks = tasks.len(), "opening timeline");

        let mut app = App::new(tasks, source.name(), colors.clone(), locale, view, started_from_menu);
        app.run(terminal)?;
        if app.exit_action() == AppExit::Quit {
            return Ok(());
        }
    }
}
