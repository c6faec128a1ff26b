//! Main application logic for the timeline screen.
//!
//! `App` owns the loaded task list and the current view (zoom, project
//! filter, selection). Every change of zoom or filter rebuilds the whole
//! `TimelineLayout`; the chart widget only ever draws the latest one.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::cmd::ViewArgs;
use crate::dates::{days_between, format_long_date, format_task_date, pad_end};
use crate::fields::{Locale, ProjectFilter, Zoom};
use crate::layout::{team_names, TaskBar, TeamLanes, TimelineLayout};
use crate::task::Task;
use crate::theme::TeamColors;
use crate::tui::{
    chart::{bar_line, GanttChart},
    colors::{TeamPalette, LABEL_GREY, TODAY_RED},
    enums::{AppExit, AppState},
    utils::centered_rect,
};

/// Timeline screen state.
pub struct App {
    state: AppState,
    tasks: Vec<Task>,
    source_name: String,
    colors: TeamColors,
    locale: Locale,
    today: NaiveDate,
    zoom: Zoom,
    filter: ProjectFilter,
    layout: TimelineLayout,
    selected: usize,
    scroll: usize,
    body_height: usize,
    status_message: String,
    exit: AppExit,
    esc_to_menu: bool,
}

impl App {
    /// Create the screen for a loaded task list.
    ///
    /// With `esc_to_menu` set, `Esc` on the chart goes back to the project
    /// menu instead of quitting.
    pub fn new(
        tasks: Vec<Task>,
        source_name: String,
        colors: TeamColors,
        locale: Locale,
        view: &ViewArgs,
        esc_to_menu: bool,
    ) -> Self {
        let today = view.today();
        let filter = view.project_filter();
        let layout = TimelineLayout::build(&tasks, view.zoom, &filter, locale, today);
        for team in team_names(&tasks) {
            if !colors.contains(&team) {
                debug!(team = %team, "no colour scheme for team, using the fallback");
            }
        }
        App {
            state: AppState::Timeline,
            tasks,
            source_name,
            colors,
            locale,
            today,
            zoom: view.zoom,
            filter,
            layout,
            selected: 0,
            scroll: 0,
            body_height: 0,
            status_message: String::new(),
            exit: AppExit::Quit,
            esc_to_menu,
        }
    }

    /// What the user asked for when the loop ended.
    pub fn exit_action(&self) -> AppExit {
        self.exit
    }

    /// Recompute the layout, keeping the selected task if it is still visible.
    fn rebuild(&mut self) {
        let selected_id = self.selected_bar().map(|(_, bar)| bar.task.id);
        self.layout = TimelineLayout::build(&self.tasks, self.zoom, &self.filter, self.locale, self.today);
        self.selected = selected_id
            .and_then(|id| self.layout.bars().position(|(_, bar)| bar.task.id == id))
            .unwrap_or(0);
        self.scroll = 0;
        self.follow_selection();
        debug!(
            zoom = ?self.zoom,
            filter = self.filter.label(),
            bars = self.layout.bar_count(),
            "layout rebuilt"
        );
    }

    fn selected_bar(&self) -> Option<(&TeamLanes, &TaskBar)> {
        self.layout.bars().nth(self.selected)
    }

    fn cycle_zoom(&mut self, forward: bool) {
        self.zoom = if forward { self.zoom.next() } else { self.zoom.previous() };
        self.rebuild();
        self.status_message = format!(
            "{}: {}",
            self.locale.pick("Escala", "Zoom"),
            self.zoom.display_name(self.locale)
        );
    }

    fn cycle_filter(&mut self, forward: bool) {
        let projects = &self.layout.projects;
        if projects.is_empty() {
            return;
        }
        let current = projects
            .iter()
            .position(|p| p == self.filter.label())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % projects.len()
        } else {
            (current + projects.len() - 1) % projects.len()
        };
        self.filter = ProjectFilter::parse(&projects[next]);
        self.rebuild();
        self.status_message = format!("{}: {}", self.locale.pick("Proyecto", "Project"), self.filter_label());
    }

    fn filter_label(&self) -> &str {
        match &self.filter {
            ProjectFilter::All => self.locale.pick("Todos", "All"),
            ProjectFilter::Responsable(name) => name,
        }
    }

    fn select_next(&mut self) {
        let total = self.layout.bar_count();
        if total > 0 && self.selected + 1 < total {
            self.selected += 1;
        }
        self.follow_selection();
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection();
    }

    /// Scroll so the selected bar's lane is on screen.
    fn follow_selection(&mut self) {
        let Some(line) = bar_line(&self.layout, self.selected) else {
            return;
        };
        if line < self.scroll {
            // Keep the team header visible when jumping up to a team's first row.
            self.scroll = line.saturating_sub(1);
        } else if self.body_height > 0 && line >= self.scroll + self.body_height {
            self.scroll = line + 1 - self.body_height;
        }
    }

    /// Handle one key press. Returns true when the screen should close.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = AppExit::Quit;
            return true;
        }

        self.status_message.clear();
        match self.state {
            AppState::Timeline => self.handle_timeline_key(key.code),
            AppState::TaskDetail => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.state = AppState::Timeline;
                }
                false
            },
            AppState::Help => {
                self.state = AppState::Timeline;
                false
            },
        }
    }

    fn handle_timeline_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => {
                self.exit = AppExit::Quit;
                return true;
            },
            KeyCode::Esc => {
                self.exit = if self.esc_to_menu { AppExit::Menu } else { AppExit::Quit };
                return true;
            },
            KeyCode::Char('m') => {
                self.exit = AppExit::Menu;
                return true;
            },
            KeyCode::Char('z') => self.cycle_zoom(true),
            KeyCode::Char('Z') => self.cycle_zoom(false),
            KeyCode::Char('f') => self.cycle_filter(true),
            KeyCode::Char('F') => self.cycle_filter(false),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home => {
                self.selected = 0;
                self.scroll = 0;
            },
            KeyCode::End => {
                self.selected = self.layout.bar_count().saturating_sub(1);
                self.follow_selection();
            },
            KeyCode::Enter => {
                if self.selected_bar().is_some() {
                    self.state = AppState::TaskDetail;
                }
            },
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {},
        }
        false
    }

    /// Poll for a key and dispatch it. Returns true when the screen should close.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    /// Render the current screen.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(2),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(f.area());
        let full = f.area();

        if self.state == AppState::Help {
            self.render_help(f, chunks[0].union(chunks[2]));
        } else {
            self.render_header(f, chunks[0]);
            self.render_chart(f, chunks[1]);
            self.render_footer(f, chunks[2]);
            if self.state == AppState::TaskDetail {
                self.render_detail(f, full);
            }
        }
        self.render_status_bar(f, chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(self.source_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  |  "),
            Span::raw(format!(
                "{}: {}",
                self.locale.pick("Escala", "Zoom"),
                self.zoom.display_name(self.locale)
            )),
            Span::raw("  |  "),
            Span::raw(format!(
                "{}: {}",
                self.locale.pick("Proyecto", "Project"),
                self.filter_label()
            )),
        ]);
        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));
        f.render_widget(header, area);
    }

    fn render_chart(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.locale.pick("Cronograma", "Timeline"));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.layout.is_empty() {
            let empty = Paragraph::new(self.locale.pick(
                "No hay tareas para este proyecto",
                "No tasks for this project",
            ))
            .alignment(Alignment::Center)
            .style(Style::default().fg(LABEL_GREY));
            f.render_widget(empty, inner);
            return;
        }

        // One line of the chart is taken by the axis.
        self.body_height = inner.height.saturating_sub(1) as usize;
        self.follow_selection();

        let chart = GanttChart::new(&self.layout, &self.colors)
            .selected(Some(self.selected))
            .scroll(self.scroll);
        f.render_widget(chart, inner);
    }

    fn summary_line(&self) -> Line<'static> {
        let w = &self.layout.window;
        Line::from(vec![
            Span::styled(
                format!("{}: ", self.locale.pick("Inicio", "Start")),
                Style::default().fg(LABEL_GREY),
            ),
            Span::raw(format_long_date(w.min_date, self.locale)),
            Span::styled(
                format!("   {}: ", self.locale.pick("Duración", "Duration")),
                Style::default().fg(LABEL_GREY),
            ),
            Span::raw(format!(
                "{} {}",
                w.total_duration_days,
                self.locale.pick("días", "days")
            )),
            Span::styled(
                format!("   {}: ", self.locale.pick("Fin", "End")),
                Style::default().fg(LABEL_GREY),
            ),
            Span::raw(format_long_date(w.max_date, self.locale)),
            Span::styled(
                format!("   {} ", self.locale.pick("Hoy", "Today")),
                Style::default().fg(TODAY_RED),
            ),
            Span::raw(format_long_date(self.today, self.locale)),
            Span::styled(
                if w.contains(self.today) {
                    String::new()
                } else {
                    format!(" ({})", self.locale.pick("fuera del cronograma", "outside the timeline"))
                },
                Style::default().fg(LABEL_GREY),
            ),
        ])
    }

    fn legend_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for lanes in &self.layout.teams {
            let palette = TeamPalette::from(&self.colors.get(&lanes.team));
            spans.push(Span::styled("■ ", Style::default().fg(palette.border)));
            spans.push(Span::raw(format!("{}   ", lanes.team)));
        }
        Line::from(spans)
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let footer = Paragraph::new(vec![self.summary_line(), self.legend_line()]);
        f.render_widget(footer, area);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let Some((lanes, bar)) = self.selected_bar() else {
            return;
        };
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let task = &bar.task;
        let palette = TeamPalette::from(&self.colors.get(&lanes.team));
        let start = task.start_at(self.today);
        let end = task.end_at(self.today);
        let days = days_between(start, pad_end(end));
        let l = self.locale;
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(Span::styled(task.title.clone(), bold)),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Equipo", "Team")), bold),
                Span::styled(task.team.clone(), Style::default().fg(palette.border)),
            ]),
        ];
        if let Some(r) = task.responsable() {
            text.push(Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Responsable", "Owner")), bold),
                Span::raw(r.to_string()),
            ]));
        }
        text.extend([
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Inicio", "Start")), bold),
                Span::raw(format_task_date(&task.start_date, l)),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Fin", "End")), bold),
                Span::raw(format_task_date(&task.end_date, l)),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Duración", "Duration")), bold),
                Span::raw(format!("{days} {}", l.pick("días", "days"))),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Progreso", "Progress")), bold),
                Span::raw(format!("{:.0}%", task.clamped_progress())),
            ]),
            Line::from(vec![
                Span::styled(format!("{}: ", l.pick("Fila", "Row")), bold),
                Span::raw(format!("{} / {}", bar.row_index + 1, lanes.row_count)),
            ]),
            Line::from(""),
            Line::from(task.description.clone()),
        ]);

        let detail = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(l.pick("Detalle de la tarea", "Task details"))
                    .border_style(Style::default().fg(palette.border)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(detail, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Timeline Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("  z / Z        Next / previous zoom (weeks, months, quarters, semesters)"),
            Line::from("  f / F        Next / previous project filter"),
            Line::from("  ↑↓ / k j     Select task"),
            Line::from("  Home / End   First / last task"),
            Line::from("  Enter        Show task details"),
            Line::from("  m            Return to project menu"),
            Line::from("  ?/h/F1       Show this help"),
            Line::from("  Esc          Back"),
            Line::from("  q / Ctrl+C   Quit"),
        ];
        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Timeline => format!(
                    "{} {} | z zoom | f {} | Enter {} | ? help | q quit",
                    self.layout.bar_count(),
                    self.locale.pick("tareas", "tasks"),
                    self.locale.pick("proyecto", "project"),
                    self.locale.pick("detalle", "details"),
                ),
                AppState::TaskDetail => "Enter/Esc to return".to_string(),
                AppState::Help => "Press any key to return".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use ratatui::backend::TestBackend;

    fn view() -> ViewArgs {
        ViewArgs {
            today: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..ViewArgs::default()
        }
    }

    fn app() -> App {
        let tasks = catalog::get_project("milagro-1-palmira").unwrap();
        App::new(tasks, "milagro-1-palmira".into(), TeamColors::default(), Locale::Es, &view(), true)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_zoom_keys_cycle_and_rebuild() {
        let mut app = app();
        assert_eq!(app.zoom, Zoom::Week);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.zoom, Zoom::Month);
        assert_eq!(app.layout.zoom, Zoom::Month);
        press(&mut app, KeyCode::Char('Z'));
        press(&mut app, KeyCode::Char('Z'));
        assert_eq!(app.zoom, Zoom::Semester);
    }

    #[test]
    fn test_filter_keys_walk_project_list() {
        let mut app = app();
        let window = app.layout.window;
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, ProjectFilter::Responsable("milagro-1".into()));
        assert_eq!(app.layout.window, window);
        press(&mut app, KeyCode::Char('F'));
        assert_eq!(app.filter, ProjectFilter::All);
        press(&mut app, KeyCode::Char('F'));
        assert_eq!(
            app.filter.label(),
            app.layout.projects.last().map(String::as_str).unwrap()
        );
    }

    #[test]
    fn test_selection_survives_rebuild() {
        let mut app = app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        let id = app.selected_bar().unwrap().1.task.id;
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.selected_bar().unwrap().1.task.id, id);
    }

    #[test]
    fn test_selection_is_bounded() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected, app.layout.bar_count() - 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, app.layout.bar_count() - 1);
    }

    #[test]
    fn test_detail_and_help_states() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::TaskDetail);
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.state, AppState::Timeline);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Timeline);
    }

    #[test]
    fn test_exit_actions() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Esc));
        assert_eq!(app.exit_action(), AppExit::Menu);

        let tasks = catalog::get_project("gestores").unwrap();
        let mut app = App::new(tasks, "gestores".into(), TeamColors::default(), Locale::En, &view(), false);
        assert!(press(&mut app, KeyCode::Esc));
        assert_eq!(app.exit_action(), AppExit::Quit);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_render_into_test_backend() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        assert_eq!(app.body_height, 40 - 3 - 2 - 1 - 2 - 1);

        press(&mut app, KeyCode::End);
        terminal.draw(|f| app.render(f)).unwrap();
        let line = bar_line(&app.layout, app.selected).unwrap();
        assert!(line >= app.scroll && line < app.scroll + app.body_height);
    }

    #[test]
    fn test_empty_filter_renders_message() {
        let tasks = catalog::get_project("gestores").unwrap();
        let view = ViewArgs {
            filter: "nobody".into(),
            ..view()
        };
        let mut app = App::new(tasks, "gestores".into(), TeamColors::default(), Locale::Es, &view, false);
        assert!(app.layout.is_empty());
        assert!(!press(&mut app, KeyCode::Enter));
        assert_eq!(app.state, AppState::Timeline);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }
}
