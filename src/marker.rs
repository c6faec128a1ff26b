//! Point-in-time markers on the window.

use chrono::NaiveDate;

use crate::dates::{days_between, today_utc};
use crate::window::Window;

/// Position of `date` in percent of the window, clamped to `[0, 100]`.
pub fn position_of(date: NaiveDate, window: &Window) -> f64 {
    if date <= window.min_date {
        return 0.0;
    }
    if date >= window.max_date {
        return 100.0;
    }
    let span = window.span_days();
    if span <= 0 {
        return 0.0;
    }
    days_between(window.min_date, date) as f64 / span as f64 * 100.0
}

/// Position of today's UTC date.
pub fn today_position(window: &Window) -> f64 {
    position_of(today_utc(), window)
}
