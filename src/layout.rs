//! Full layout pass over a task list.
//!
//! `TimelineLayout::build` runs the whole pipeline in one pure call: window
//! from every task, project filter, per-team lane packing with bar geometry,
//! axis intervals and the today marker. Nothing is cached; callers rebuild on
//! every change of tasks, zoom or filter.

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::{Locale, ProjectFilter, Zoom};
use crate::geometry::Geometry;
use crate::intervals::{generate_intervals, Interval};
use crate::lanes::{forced_count, pack_lanes, row_count};
use crate::marker::position_of;
use crate::task::Task;
use crate::window::{compute_window_at, Window};

/// A task placed on the chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBar {
    pub task: Task,
    pub row_index: usize,
    pub geometry: Geometry,
}

/// One team's band of lanes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLanes {
    pub team: String,
    pub row_count: usize,
    /// Tasks drawn over another bar because every row was taken.
    pub forced_count: usize,
    /// Grouped by row, lowest row first.
    pub bars: Vec<TaskBar>,
}

impl TeamLanes {
    /// Whether some task found no free row and shares the last one.
    pub fn hit_row_cap(&self) -> bool {
        self.forced_count > 0
    }
}

/// Everything a renderer needs for one frame of the chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    pub window: Window,
    pub zoom: Zoom,
    pub intervals: Vec<Interval>,
    pub teams: Vec<TeamLanes>,
    pub today: NaiveDate,
    pub today_position: f64,
    /// Selectable project filters: `"all"` then each `responsable` in order of appearance.
    pub projects: Vec<String>,
    pub filter: String,
}

/// Distinct non-empty `responsable` values in order of first appearance.
pub fn project_names(tasks: &[Task]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for r in tasks.iter().filter_map(Task::responsable) {
        if !names.iter().any(|n| n == r) {
            names.push(r.to_string());
        }
    }
    names
}

/// Distinct team names in order of first appearance.
pub fn team_names<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    let mut teams: Vec<String> = Vec::new();
    for t in tasks {
        if !teams.iter().any(|n| *n == t.team) {
            teams.push(t.team.clone());
        }
    }
    teams
}

impl TimelineLayout {
    /// Lay out `tasks` for the given zoom and filter.
    pub fn build(
        tasks: &[Task],
        zoom: Zoom,
        filter: &ProjectFilter,
        locale: Locale,
        today: NaiveDate,
    ) -> Self {
        // The axis always spans every task, filtered or not.
        let window = compute_window_at(tasks, today);

        let visible: Vec<&Task> = tasks
            .iter()
            .filter(|t| filter.matches(t.responsable()))
            .collect();

        let teams = team_names(visible.iter().copied())
            .into_iter()
            .map(|team| {
                let team_tasks: Vec<Task> = visible
                    .iter()
                    .filter(|t| t.team == team)
                    .map(|t| (*t).clone())
                    .collect();
                let placed = pack_lanes(&team_tasks, today);
                let bars = placed
                    .iter()
                    .map(|p| TaskBar {
                        task: p.task.clone(),
                        row_index: p.row_index,
                        geometry: p.task.geometry(&window, today),
                    })
                    .collect();
                TeamLanes {
                    team,
                    row_count: row_count(&placed),
                    forced_count: forced_count(&placed),
                    bars,
                }
            })
            .collect();

        let mut projects = vec![ProjectFilter::ALL_SENTINEL.to_string()];
        projects.extend(project_names(tasks));

        TimelineLayout {
            window,
            zoom,
            intervals: generate_intervals(&window, zoom, locale),
            teams,
            today,
            today_position: position_of(today, &window),
            projects,
            filter: filter.label().to_string(),
        }
    }

    /// True when the filter leaves nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Bars in display order: team by team, row by row.
    pub fn bars(&self) -> impl Iterator<Item = (&TeamLanes, &TaskBar)> {
        self.teams
            .iter()
            .flat_map(|lanes| lanes.bars.iter().map(move |bar| (lanes, bar)))
    }

    /// Number of visible bars.
    pub fn bar_count(&self) -> usize {
        self.teams.iter().map(|t| t.bars.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::lanes::MAX_ROWS;
    use crate::task::task;
    use chrono::Datelike;
    use clap::ValueEnum;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn milagro() -> Vec<Task> {
        catalog::get_project("milagro-1-palmira").unwrap()
    }

    #[test]
    fn test_filter_never_changes_window() {
        let tasks = milagro();
        let all = TimelineLayout::build(&tasks, Zoom::Week, &ProjectFilter::All, Locale::Es, today());
        let some = TimelineLayout::build(
            &tasks,
            Zoom::Week,
            &ProjectFilter::Responsable("novedades".into()),
            Locale::Es,
            today(),
        );
        assert_eq!(all.window, some.window);
        assert_eq!(all.intervals, some.intervals);
        assert!(some.bar_count() < all.bar_count());
        assert!(some.bars().all(|(_, b)| b.task.responsable() == Some("novedades")));
    }

    #[test]
    fn test_teams_in_order_of_appearance() {
        let layout = TimelineLayout::build(&milagro(), Zoom::Month, &ProjectFilter::All, Locale::Es, today());
        let teams: Vec<_> = layout.teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(teams[0], "Migracion");
        assert_eq!(teams.len(), 5);
        assert_eq!(layout.bar_count(), 34);
    }

    #[test]
    fn test_project_list_starts_with_all() {
        let layout = TimelineLayout::build(&milagro(), Zoom::Week, &ProjectFilter::All, Locale::Es, today());
        assert_eq!(layout.projects[0], "all");
        assert_eq!(layout.projects[1], "milagro-1");
        assert!(!layout.projects.iter().any(|p| p.is_empty()));
    }

    #[test]
    fn test_migracion_first_two_tasks_stack() {
        let layout = TimelineLayout::build(&milagro(), Zoom::Week, &ProjectFilter::All, Locale::Es, today());
        let migracion = &layout.teams[0];
        let row_of = |title: &str| {
            migracion
                .bars
                .iter()
                .find(|b| b.task.title == title)
                .map(|b| b.row_index)
                .unwrap()
        };
        assert_ne!(
            row_of("Disponibilización en Mongo de ICA (Deudas)"),
            row_of("Disponibilización en Mongo de ICA (Titulos ejecutivos)")
        );
    }

    #[test]
    fn test_empty_input() {
        let layout = TimelineLayout::build(&[], Zoom::Week, &ProjectFilter::All, Locale::Es, today());
        assert!(layout.is_empty());
        assert_eq!(layout.window.total_duration_days, 30);
        assert_eq!(layout.window.min_date, today());
        assert_eq!(layout.projects, vec!["all"]);
    }

    #[test]
    fn test_unknown_filter_is_empty_but_keeps_axis() {
        let layout = TimelineLayout::build(
            &milagro(),
            Zoom::Quarter,
            &ProjectFilter::Responsable("nobody".into()),
            Locale::Es,
            today(),
        );
        assert!(layout.is_empty());
        assert!(!layout.intervals.is_empty());
    }

    #[test]
    fn test_row_cap_reports_only_forced_placements() {
        let full: Vec<Task> = (0..MAX_ROWS as u64)
            .map(|i| task(i, "2025-03-01", "2025-03-31", "Crowded"))
            .collect();
        let layout = TimelineLayout::build(&full, Zoom::Month, &ProjectFilter::All, Locale::Es, today());
        assert_eq!(layout.teams[0].row_count, MAX_ROWS);
        assert!(!layout.teams[0].hit_row_cap());

        let mut over = full;
        over.push(task(99, "2025-03-05", "2025-03-06", "Crowded"));
        let layout = TimelineLayout::build(&over, Zoom::Month, &ProjectFilter::All, Locale::Es, today());
        assert_eq!(layout.teams[0].forced_count, 1);
        assert!(layout.teams[0].hit_row_cap());
    }

    #[test]
    fn test_builds_for_tasks_at_end_of_calendar() {
        let last = NaiveDate::MAX;
        let s = format!("{}-{}-{}", last.year(), last.month(), last.day());
        let tasks = vec![task(1, &s, &s, "QA"), task(2, "0-01-01", &s, "QA")];
        for &zoom in Zoom::value_variants() {
            let layout = TimelineLayout::build(&tasks, zoom, &ProjectFilter::All, Locale::En, today());
            assert_eq!(layout.window.max_date, last);
            assert!(!layout.intervals.is_empty(), "{zoom:?}");
            assert!(layout.intervals.len() <= crate::intervals::MAX_INTERVALS);
            assert_eq!(layout.bar_count(), 2);
            for (_, bar) in layout.bars() {
                assert!(bar.geometry.left >= 0.0 && bar.geometry.left <= 100.0);
                assert!(bar.geometry.width >= 0.5);
            }
        }

        let single = vec![task(1, &s, &s, "QA")];
        let layout = TimelineLayout::build(&single, Zoom::Week, &ProjectFilter::All, Locale::En, today());
        assert_eq!(layout.window.total_duration_days, 14);
        assert_eq!(layout.today_position, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let layout = TimelineLayout::build(&milagro(), Zoom::Week, &ProjectFilter::All, Locale::Es, today());
        let json = serde_json::to_value(&layout).unwrap();
        assert!(json["window"]["minDate"].is_string());
        assert!(json["todayPosition"].is_number());
        assert!(json["teams"][0]["bars"][0]["rowIndex"].is_number());
        assert_eq!(json["teams"][0]["forcedCount"], 0);
        assert_eq!(json["zoom"], "week");
    }
}
