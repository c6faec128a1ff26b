//! Date window covering a task list.
//!
//! The window is the shared coordinate space of the whole chart. It is always
//! computed from the unfiltered task list so that changing the project filter
//! changes which bars are drawn, never the axis.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{add_days, add_months, days_between, parse_date_or, today_utc};
use crate::task::Task;

/// Days of padding added before the earliest and after the latest date.
pub const WINDOW_PADDING_DAYS: i64 = 3;
/// Shortest window, in days.
pub const MIN_WINDOW_DAYS: i64 = 14;
/// Nominal duration reported by the fallback window.
pub const FALLBACK_WINDOW_DAYS: i64 = 30;

/// Padded `[min_date, max_date]` span of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub total_duration_days: i64,
}

impl Window {
    /// Window used when there are no dates to work from: one month from `today`.
    pub fn fallback(today: NaiveDate) -> Self {
        Window {
            min_date: today,
            max_date: add_months(today, 1),
            total_duration_days: FALLBACK_WINDOW_DAYS,
        }
    }

    /// Actual distance between the window edges, in days.
    ///
    /// Equal to `total_duration_days` except for the fallback window.
    pub fn span_days(&self) -> i64 {
        days_between(self.min_date, self.max_date)
    }

    /// Whether `date` lies within the window, edges included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }
}

/// Compute the window for `tasks`, using today's UTC date for fallbacks.
pub fn compute_window(tasks: &[Task]) -> Window {
    compute_window_at(tasks, today_utc())
}

/// Compute the window for `tasks` with an explicit "today".
///
/// Every non-empty start and end date counts; strings that cannot be parsed
/// count as `today`. With no dates at all the one-month fallback window is
/// returned. The result always spans at least [`MIN_WINDOW_DAYS`].
pub fn compute_window_at(tasks: &[Task], today: NaiveDate) -> Window {
    let dates = tasks
        .iter()
        .flat_map(|t| [t.start_date.as_str(), t.end_date.as_str()])
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date_or(s, today));

    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for date in dates {
        bounds = Some(match bounds {
            None => (date, date),
            Some((lo, hi)) => (lo.min(date), hi.max(date)),
        });
    }

    let Some((earliest, latest)) = bounds else {
        return Window::fallback(today);
    };

    let mut min_date = add_days(earliest, -WINDOW_PADDING_DAYS);
    let mut max_date = add_days(latest, WINDOW_PADDING_DAYS);

    if days_between(min_date, max_date) < MIN_WINDOW_DAYS {
        max_date = add_days(min_date, MIN_WINDOW_DAYS);
        // Only short of the minimum when max_date hit the end of the calendar.
        if days_between(min_date, max_date) < MIN_WINDOW_DAYS {
            min_date = add_days(max_date, -MIN_WINDOW_DAYS);
        }
    }
    let total_duration_days = days_between(min_date, max_date);

    Window {
        min_date,
        max_date,
        total_duration_days,
    }
}
