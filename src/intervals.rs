//! Time-axis intervals at a chosen zoom level.
//!
//! Boundaries are aligned to calendar units: Mondays for weeks, the first of
//! the month for months, January/April/July/October for quarters and
//! January/July for semesters. Each interval also carries the share of the
//! window it covers so a renderer can lay the header out directly.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates::{add_days, add_months, days_between, format_month_year, format_short_date, start_of_week};
use crate::fields::{Locale, Zoom};
use crate::window::Window;

/// Upper bound on generated boundaries, whatever the window.
pub const MAX_INTERVALS: usize = 200;

/// One tick of the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    /// Boundary where this interval starts.
    pub start: NaiveDate,
    /// Next boundary, or the window's end for the last interval.
    pub end: NaiveDate,
    pub label: String,
    /// Percentage (0–100) of the window span covered from `start` to `end`.
    pub width: f64,
}

impl Zoom {
    /// Header label for an interval starting at `date`.
    pub fn label_for(self, date: NaiveDate, locale: Locale) -> String {
        match self {
            Zoom::Week => format_short_date(date, locale),
            Zoom::Month => format_month_year(date, locale),
            Zoom::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
            Zoom::Semester => format!("S{} {}", if date.month0() < 6 { 1 } else { 2 }, date.year()),
        }
    }

    /// Boundary of the unit containing `date`.
    pub fn align(self, date: NaiveDate) -> NaiveDate {
        match self {
            Zoom::Week => start_of_week(date),
            Zoom::Month => first_of_month(date.year(), date.month0()),
            Zoom::Quarter => first_of_month(date.year(), date.month0() / 3 * 3),
            Zoom::Semester => first_of_month(date.year(), if date.month0() < 6 { 0 } else { 6 }),
        }
    }

    /// Boundary following `boundary`.
    pub fn step(self, boundary: NaiveDate) -> NaiveDate {
        match self {
            Zoom::Week => add_days(boundary, 7),
            Zoom::Month => add_months(boundary, 1),
            Zoom::Quarter => add_months(boundary, 3),
            Zoom::Semester => add_months(boundary, 6),
        }
    }
}

fn first_of_month(year: i32, month0: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Ordered interval boundaries covering the window.
///
/// The first boundary is the aligned unit start on or before `min_date`;
/// boundaries keep coming until one passes `max_date` or the cap is hit.
/// For weeks an inverted window still yields a single boundary at `min_date`.
pub fn interval_boundaries(window: &Window, zoom: Zoom) -> Vec<NaiveDate> {
    let mut boundaries = Vec::new();
    let mut current = zoom.align(window.min_date);

    while current <= window.max_date && boundaries.len() < MAX_INTERVALS {
        boundaries.push(current);
        let next = zoom.step(current);
        if next <= current {
            break;
        }
        current = next;
    }

    if boundaries.is_empty() && zoom == Zoom::Week {
        boundaries.push(window.min_date);
    }
    boundaries
}

/// Axis intervals for the window at the given zoom level.
///
/// Widths are zero when the window has no positive span.
pub fn generate_intervals(window: &Window, zoom: Zoom, locale: Locale) -> Vec<Interval> {
    let boundaries = interval_boundaries(window, zoom);
    let span = window.span_days();

    boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = boundaries.get(i + 1).copied().unwrap_or(window.max_date);
            let width = if span > 0 {
                days_between(start, end) as f64 / span as f64 * 100.0
            } else {
                0.0
            };
            Interval {
                start,
                end,
                label: zoom.label_for(start, locale),
                width,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::window::compute_window_at;
    use chrono::Weekday;
    use clap::ValueEnum;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window(min: NaiveDate, max: NaiveDate) -> Window {
        Window {
            min_date: min,
            max_date: max,
            total_duration_days: days_between(min, max),
        }
    }

    #[test]
    fn test_quarters_over_spring_and_summer() {
        let w = window(d(2025, 4, 1), d(2025, 9, 1));
        let intervals = generate_intervals(&w, Zoom::Quarter, Locale::Es);
        let starts: Vec<_> = intervals.iter().map(|i| i.start).collect();
        let labels: Vec<_> = intervals.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(starts, vec![d(2025, 4, 1), d(2025, 7, 1)]);
        assert_eq!(labels, vec!["Q2 2025", "Q3 2025"]);
    }

    #[test]
    fn test_weeks_start_on_monday_before_window() {
        // 2025-05-09 is a Friday.
        let w = window(d(2025, 5, 9), d(2025, 5, 23));
        let boundaries = interval_boundaries(&w, Zoom::Week);
        assert_eq!(boundaries, vec![d(2025, 5, 5), d(2025, 5, 12), d(2025, 5, 19)]);
        assert!(boundaries.iter().all(|b| b.weekday() == Weekday::Mon));
    }

    #[test]
    fn test_week_from_sunday_goes_back_six_days() {
        let w = window(d(2025, 5, 18), d(2025, 6, 1));
        assert_eq!(interval_boundaries(&w, Zoom::Week)[0], d(2025, 5, 12));
    }

    #[test]
    fn test_months_and_labels() {
        let w = window(d(2025, 11, 20), d(2026, 2, 3));
        let intervals = generate_intervals(&w, Zoom::Month, Locale::Es);
        let labels: Vec<_> = intervals.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["noviembre 2025", "diciembre 2025", "enero 2026", "febrero 2026"]
        );
    }

    #[test]
    fn test_semesters_roll_over_years() {
        let w = window(d(2024, 10, 29), d(2026, 2, 10));
        let intervals = generate_intervals(&w, Zoom::Semester, Locale::En);
        let labels: Vec<_> = intervals.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["S2 2024", "S1 2025", "S2 2025", "S1 2026"]);
        assert_eq!(intervals[0].start, d(2024, 7, 1));
    }

    #[test]
    fn test_quarters_roll_over_years() {
        let w = window(d(2025, 11, 10), d(2026, 4, 20));
        let intervals = generate_intervals(&w, Zoom::Quarter, Locale::En);
        let starts: Vec<_> = intervals.iter().map(|i| i.start).collect();
        assert_eq!(starts, vec![d(2025, 10, 1), d(2026, 1, 1), d(2026, 4, 1)]);
        let labels: Vec<_> = intervals.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Q4 2025", "Q1 2026", "Q2 2026"]);
        assert_eq!(intervals[2].end, d(2026, 4, 20));
    }

    #[test]
    fn test_steps_stop_at_end_of_calendar() {
        let w = window(NaiveDate::MAX.with_day(1).unwrap(), NaiveDate::MAX);
        for &zoom in Zoom::value_variants() {
            let b = interval_boundaries(&w, zoom);
            assert!(!b.is_empty(), "{zoom:?}");
            assert!(b.len() < MAX_INTERVALS, "{zoom:?}");
            assert!(b.windows(2).all(|p| p[0] < p[1]), "{zoom:?}");
            assert!(*b.last().unwrap() <= NaiveDate::MAX);
        }
        assert_eq!(Zoom::Week.step(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_week_labels() {
        let w = window(d(2025, 5, 9), d(2025, 5, 23));
        let intervals = generate_intervals(&w, Zoom::Week, Locale::Es);
        assert_eq!(intervals[0].label, "5 may");
        assert_eq!(intervals[1].label, "12 may");
    }

    #[test]
    fn test_widths_use_next_boundary_and_window_end() {
        let w = window(d(2025, 5, 5), d(2025, 5, 19));
        let intervals = generate_intervals(&w, Zoom::Week, Locale::Es);
        assert_eq!(intervals.len(), 3);
        assert!((intervals[0].width - 50.0).abs() < 1e-9);
        assert!((intervals[1].width - 50.0).abs() < 1e-9);
        // Last boundary sits exactly on max_date.
        assert_eq!(intervals[2].width, 0.0);
        assert_eq!(intervals[2].end, w.max_date);
    }

    #[test]
    fn test_zero_span_window_has_zero_widths() {
        let w = window(d(2025, 5, 5), d(2025, 5, 5));
        let intervals = generate_intervals(&w, Zoom::Month, Locale::Es);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].width, 0.0);
    }

    #[test]
    fn test_inverted_window_yields_single_week() {
        let w = window(d(2025, 6, 10), d(2025, 5, 1));
        let boundaries = interval_boundaries(&w, Zoom::Week);
        assert_eq!(boundaries, vec![d(2025, 6, 10)]);
        assert!(interval_boundaries(&w, Zoom::Month).is_empty());
    }

    #[test]
    fn test_long_window_is_capped() {
        let w = window(d(2000, 1, 1), d(2020, 1, 1));
        assert_eq!(interval_boundaries(&w, Zoom::Week).len(), MAX_INTERVALS);
        assert_eq!(interval_boundaries(&w, Zoom::Month).len(), MAX_INTERVALS);
    }

    #[test]
    fn test_boundaries_are_ordered_and_inside_window() {
        let today = d(2025, 5, 1);
        for name in catalog::project_names() {
            let tasks = catalog::get_project(&name).unwrap();
            let w = compute_window_at(&tasks, today);
            for &zoom in Zoom::value_variants() {
                let b = interval_boundaries(&w, zoom);
                assert!(!b.is_empty());
                assert!(b[0] <= w.min_date);
                assert!(*b.last().unwrap() <= w.max_date);
                assert!(b.windows(2).all(|p| p[0] < p[1]));
            }
        }
    }
}
