//! Project picker shown when no task list was given on the command line.
//!
//! Lists the built-in projects and the sample list. Picking one hands a
//! `TaskSource` back to the runner, which loads it and opens the timeline.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::catalog;
use crate::fields::Locale;
use crate::source::TaskSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    ProjectList,
    About,
}

/// Main menu application state.
pub struct MenuApp {
    state: MenuState,
    locale: Locale,
    list_state: ListState,
    sources: Vec<TaskSource>,
    status_message: String,
    should_exit: bool,
    selected: Option<TaskSource>,
}

impl MenuApp {
    /// Create a menu over the built-in projects.
    pub fn new(locale: Locale) -> Self {
        let mut sources: Vec<TaskSource> = catalog::project_names()
            .into_iter()
            .map(TaskSource::Project)
            .collect();
        sources.push(TaskSource::Example);

        let mut list_state = ListState::default();
        list_state.select(Some(0));
        MenuApp {
            state: MenuState::ProjectList,
            locale,
            list_state,
            sources,
            status_message: String::new(),
            should_exit: false,
            selected: None,
        }
    }

    /// Show a message in the status bar, e.g. why a project failed to load.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// The source picked by the user, if any. Resets the menu for its next run.
    pub fn take_selection(&mut self) -> Option<TaskSource> {
        self.should_exit = false;
        self.selected.take()
    }

    fn item_label(&self, source: &TaskSource) -> String {
        match source {
            TaskSource::Example => self.locale.pick("Ejemplo", "Example").to_string(),
            other => other.name(),
        }
    }

    /// Handle one key press.
    fn handle_key(&mut self, key: KeyCode) {
        self.status_message.clear();
        match self.state {
            MenuState::About => self.state = MenuState::ProjectList,
            MenuState::ProjectList => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    if let Some(selected) = self.list_state.selected() {
                        if selected > 0 {
                            self.list_state.select(Some(selected - 1));
                        }
                    }
                },
                KeyCode::Down | KeyCode::Char('j') => {
                    if let Some(selected) = self.list_state.selected() {
                        if selected + 1 < self.sources.len() {
                            self.list_state.select(Some(selected + 1));
                        }
                    }
                },
                KeyCode::Enter => {
                    if let Some(selected) = self.list_state.selected() {
                        self.selected = self.sources.get(selected).cloned();
                        self.should_exit = self.selected.is_some();
                    }
                },
                KeyCode::Char('a') => self.state = MenuState::About,
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.selected = None;
                    self.should_exit = true;
                },
                _ => {},
            },
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        let header = Paragraph::new(Line::from(Span::styled(
            self.locale.pick("CRONOGRAMA DE PROYECTOS", "PROJECT TIMELINE"),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
        f.render_widget(header, chunks[0]);

        match self.state {
            MenuState::ProjectList => self.render_project_list(f, chunks[1]),
            MenuState::About => self.render_about(f, chunks[1]),
        }

        self.render_status_bar(f, chunks[2]);
    }

    fn render_project_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .sources
            .iter()
            .map(|source| ListItem::new(Line::from(format!("  {}", self.item_label(source)))))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.locale.pick("Seleccionar proyecto", "Select Project")),
            )
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_about(&self, f: &mut Frame, area: Rect) {
        let about_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "gantt - Project Timeline",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Tasks grouped by team on a shared date axis,"),
            Line::from("with overlapping tasks stacked into lanes."),
            Line::from(""),
            Line::from(format!("Version: {}", env!("CARGO_PKG_VERSION"))),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let about = Paragraph::new(about_text)
            .block(Block::default().borders(Borders::ALL).title("About"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(about, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                MenuState::ProjectList => "Use ↑↓ to navigate, Enter to open, a for about, q/Esc to quit".to_string(),
                MenuState::About => "Press any key to return".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop for the menu.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            self.handle_input()?;

            if self.should_exit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_lists_catalog_then_example() {
        let menu = MenuApp::new(Locale::Es);
        assert_eq!(menu.sources.len(), catalog::project_names().len() + 1);
        assert_eq!(menu.sources.last(), Some(&TaskSource::Example));
    }

    #[test]
    fn test_enter_picks_highlighted_source() {
        let mut menu = MenuApp::new(Locale::Es);
        menu.handle_key(KeyCode::Down);
        menu.handle_key(KeyCode::Enter);
        assert!(menu.should_exit);
        let expected = TaskSource::Project(catalog::project_names()[1].clone());
        assert_eq!(menu.take_selection(), Some(expected));
        assert!(!menu.should_exit);
        assert_eq!(menu.take_selection(), None);
    }

    #[test]
    fn test_navigation_is_bounded_and_quit_picks_nothing() {
        let mut menu = MenuApp::new(Locale::En);
        menu.handle_key(KeyCode::Up);
        assert_eq!(menu.list_state.selected(), Some(0));
        for _ in 0..10 {
            menu.handle_key(KeyCode::Char('j'));
        }
        assert_eq!(menu.list_state.selected(), Some(menu.sources.len() - 1));
        menu.handle_key(KeyCode::Esc);
        assert!(menu.should_exit);
        assert_eq!(menu.take_selection(), None);
    }

    #[test]
    fn test_about_returns_on_any_key() {
        let mut menu = MenuApp::new(Locale::Es);
        menu.handle_key(KeyCode::Char('a'));
        assert_eq!(menu.state, MenuState::About);
        menu.handle_key(KeyCode::Char('x'));
        assert_eq!(menu.state, MenuState::ProjectList);
    }

    #[test]
    fn test_status_message_shows_until_next_key() {
        let mut menu = MenuApp::new(Locale::Es);
        menu.set_status("could not load");
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| menu.render(f)).unwrap();
        let last_row: String = (0..60)
            .map(|x| terminal.backend().buffer()[(x, 11)].symbol().to_string())
            .collect();
        assert!(last_row.starts_with("could not load"));
        menu.handle_key(KeyCode::Down);
        assert!(menu.status_message.is_empty());
    }
}
