//! Command implementations for the CLI interface.
//!
//! Each subcommand loads nothing itself: `main` resolves the task source and
//! hands the tasks over. Handlers run one layout pass and print it either as
//! plain text or as JSON.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog;
use crate::dates::{format_iso, format_long_date, format_task_date, format_week_range, today_utc, try_parse_date};
use crate::fields::{Locale, OutputFormat, ProjectFilter, Zoom};
use crate::layout::{team_names, TimelineLayout};
use crate::marker::today_position;
use crate::source::{example_tasks, validate_dates, TaskSource};
use crate::task::Task;
use crate::theme::TeamColors;
use crate::tui::run::run_tui;
use crate::tui::utils::truncate;
use crate::window::compute_window;

/// Options shared by every command that lays out a chart.
#[derive(Args, Clone, Debug)]
pub struct ViewArgs {
    /// Axis granularity: week | month | quarter | semester.
    #[arg(long, value_enum, default_value_t = Zoom::Week)]
    pub zoom: Zoom,
    /// Only tasks whose `responsable` matches; "all" shows everything.
    #[arg(long, default_value = ProjectFilter::ALL_SENTINEL)]
    pub filter: String,
    /// Date to treat as today (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,
}

impl ViewArgs {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(today_utc)
    }

    pub fn project_filter(&self) -> ProjectFilter {
        ProjectFilter::parse(&self.filter)
    }
}

impl Default for ViewArgs {
    fn default() -> Self {
        ViewArgs {
            zoom: Zoom::Week,
            filter: ProjectFilter::ALL_SENTINEL.to_string(),
            today: None,
        }
    }
}

fn parse_today(s: &str) -> Result<NaiveDate, String> {
    try_parse_date(s).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive timeline (the default).
    Ui {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the complete layout: window, axis, lanes and bar geometry.
    Layout {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the date window, duration and teams.
    Summary {
        /// Date to treat as today (YYYY-MM-DD).
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the axis intervals for a zoom level.
    Intervals {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the row assigned to each task, team by team.
    Lanes {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check a task list for structural problems and unusable dates.
    Validate,

    /// List the built-in projects.
    Projects {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print a sample task list as JSON.
    Example,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error serialising output: {e}");
            std::process::exit(1);
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(source: Option<TaskSource>, colors: TeamColors, locale: Locale, view: ViewArgs) {
    if let Err(e) = run_tui(source, colors, locale, view) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the full layout.
pub fn cmd_layout(tasks: &[Task], locale: Locale, view: &ViewArgs, format: OutputFormat) {
    let layout = TimelineLayout::build(tasks, view.zoom, &view.project_filter(), locale, view.today());
    debug!(
        teams = layout.teams.len(),
        bars = layout.bar_count(),
        intervals = layout.intervals.len(),
        "layout computed"
    );
    warn_on_row_cap(&layout);

    if format == OutputFormat::Json {
        print_json(&layout);
        return;
    }

    print_window_line(&layout);
    println!();
    print_intervals(&layout, locale);
    println!();
    if layout.is_empty() {
        println!("No tasks match filter '{}'.", layout.filter);
        return;
    }
    for lanes in &layout.teams {
        println!("{} ({} rows)", lanes.team, lanes.row_count);
        for bar in &lanes.bars {
            println!(
                "  [{:>2}] left {:>6.2}%  width {:>6.2}%  {} → {}  {}",
                bar.row_index,
                bar.geometry.left,
                bar.geometry.width,
                bar.task.start_date,
                bar.task.end_date,
                truncate(&bar.task.title, 60)
            );
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    min_date: NaiveDate,
    max_date: NaiveDate,
    total_duration_days: i64,
    teams: Vec<String>,
    task_count: usize,
    projects: Vec<String>,
    today: NaiveDate,
    today_position: f64,
}

/// Print the window and the teams it covers.
pub fn cmd_summary(tasks: &[Task], locale: Locale, today: Option<NaiveDate>, format: OutputFormat) {
    let today = today.unwrap_or_else(today_utc);
    let layout = TimelineLayout::build(tasks, Zoom::Week, &ProjectFilter::All, locale, today);
    let summary = Summary {
        min_date: layout.window.min_date,
        max_date: layout.window.max_date,
        total_duration_days: layout.window.total_duration_days,
        teams: team_names(tasks),
        task_count: tasks.len(),
        projects: layout.projects.iter().skip(1).cloned().collect(),
        today,
        today_position: layout.today_position,
    };

    if format == OutputFormat::Json {
        print_json(&summary);
        return;
    }

    println!("{:<10} {}", locale.pick("Inicio:", "Start:"), format_long_date(summary.min_date, locale));
    println!("{:<10} {}", locale.pick("Fin:", "End:"), format_long_date(summary.max_date, locale));
    println!(
        "{:<10} {} {}",
        locale.pick("Duración:", "Duration:"),
        summary.total_duration_days,
        locale.pick("días", "days")
    );
    println!("{:<10} {}", locale.pick("Equipos:", "Teams:"), summary.teams.join(", "));
    println!("{:<10} {}", locale.pick("Tareas:", "Tasks:"), summary.task_count);
    if !summary.projects.is_empty() {
        println!("{:<10} {}", locale.pick("Proyectos:", "Projects:"), summary.projects.join(", "));
    }
    println!(
        "{:<10} {} ({:.1}%)",
        locale.pick("Hoy:", "Today:"),
        format_iso(summary.today),
        summary.today_position
    );
}

/// Print the axis intervals.
pub fn cmd_intervals(tasks: &[Task], locale: Locale, view: &ViewArgs, format: OutputFormat) {
    let layout = TimelineLayout::build(tasks, view.zoom, &ProjectFilter::All, locale, view.today());
    if format == OutputFormat::Json {
        print_json(&layout.intervals);
        return;
    }
    print_window_line(&layout);
    print_intervals(&layout, locale);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaneRow<'a> {
    team: &'a str,
    id: u64,
    title: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    row_index: usize,
}

/// Print the row assignment of every visible task.
pub fn cmd_lanes(tasks: &[Task], locale: Locale, view: &ViewArgs, format: OutputFormat) {
    let layout = TimelineLayout::build(tasks, view.zoom, &view.project_filter(), locale, view.today());
    warn_on_row_cap(&layout);

    if format == OutputFormat::Json {
        let rows: Vec<LaneRow> = layout
            .bars()
            .map(|(lanes, bar)| LaneRow {
                team: &lanes.team,
                id: bar.task.id,
                title: &bar.task.title,
                start_date: &bar.task.start_date,
                end_date: &bar.task.end_date,
                row_index: bar.row_index,
            })
            .collect();
        print_json(&rows);
        return;
    }

    if layout.is_empty() {
        println!("No tasks match filter '{}'.", layout.filter);
        return;
    }
    println!("{:<5} {:<5} {:<8} {:<8} {}", "Row", "ID", "Start", "End", "Title");
    for lanes in &layout.teams {
        println!("== {} ({} rows)", lanes.team, lanes.row_count);
        for bar in &lanes.bars {
            println!(
                "{:<5} {:<5} {:<8} {:<8} {}",
                bar.row_index,
                bar.task.id,
                format_task_date(&bar.task.start_date, locale),
                format_task_date(&bar.task.end_date, locale),
                truncate(&bar.task.title, 70)
            );
        }
    }
}

/// Validate a task source. Exits non-zero when problems are found.
pub fn cmd_validate(source: &TaskSource) {
    let tasks = match source.load() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Invalid: {e}");
            std::process::exit(1);
        }
    };
    if tasks.is_empty() {
        eprintln!("Invalid: the task list is empty");
        std::process::exit(1);
    }

    let problems = validate_dates(&tasks);
    if problems.is_empty() {
        println!("OK: {} tasks in {}", tasks.len(), source.name());
        return;
    }
    for p in &problems {
        println!("{p}");
    }
    eprintln!("{} problem(s) found in {}", problems.len(), source.name());
    std::process::exit(1);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    task_count: usize,
    min_date: NaiveDate,
    max_date: NaiveDate,
    today_position: f64,
}

/// List the built-in projects with their date windows.
pub fn cmd_projects(format: OutputFormat) {
    let entries: Vec<CatalogEntry> = catalog::project_names()
        .into_iter()
        .filter_map(|name| {
            let tasks = catalog::get_project(&name)?;
            let window = compute_window(&tasks);
            Some(CatalogEntry {
                name,
                task_count: tasks.len(),
                min_date: window.min_date,
                max_date: window.max_date,
                today_position: today_position(&window),
            })
        })
        .collect();

    if format == OutputFormat::Json {
        print_json(&entries);
        return;
    }
    if entries.is_empty() {
        println!("No built-in projects.");
        return;
    }
    println!("{:<24} {:>5}  {:<10}  {:<10}  {:>6}", "Project", "Tasks", "From", "To", "Today");
    for e in entries {
        println!(
            "{:<24} {:>5}  {:<10}  {:<10}  {:>5.1}%",
            truncate(&e.name, 24),
            e.task_count,
            format_iso(e.min_date),
            format_iso(e.max_date),
            e.today_position
        );
    }
}

/// Print the sample task list.
pub fn cmd_example() {
    print_json(&example_tasks());
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn print_window_line(layout: &TimelineLayout) {
    println!(
        "Window {} .. {} ({} days)  zoom: {:?}  filter: {}  today: {:.1}%",
        format_iso(layout.window.min_date),
        format_iso(layout.window.max_date),
        layout.window.total_duration_days,
        layout.zoom,
        layout.filter,
        layout.today_position
    );
}

fn print_intervals(layout: &TimelineLayout, locale: Locale) {
    for interval in &layout.intervals {
        let range = if layout.zoom == Zoom::Week {
            format_week_range(interval.start, locale)
        } else {
            String::new()
        };
        println!(
            "  {}  {:>7.2}%  {:<16} {}",
            format_iso(interval.start),
            interval.width,
            interval.label,
            range
        );
    }
}

fn warn_on_row_cap(layout: &TimelineLayout) {
    for lanes in layout.teams.iter().filter(|l| l.hit_row_cap()) {
        warn!(team = %lanes.team, forced = lanes.forced_count, "row limit reached; some bars share the last row");
    }
}

/// Log the source that was loaded and any dates that will fall back to today.
pub fn log_loaded(source: &TaskSource, tasks: &[Task]) {
    info!(source = %source.name(), tasks = tasks.len(), "task list loaded");
    for problem in validate_dates(tasks) {
        warn!("{problem}");
    }
}
