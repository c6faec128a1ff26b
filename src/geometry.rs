//! Mapping task dates onto the window.
//!
//! Positions are percentages of the window span. A task that starts before
//! the window is pinned to the left edge; one that runs past the end is left
//! to overflow on the right.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{days_between, pad_end};
use crate::task::Task;
use crate::window::Window;

/// Narrowest bar, in percent, so very short tasks stay visible.
pub const MIN_VISIBLE_WIDTH: f64 = 0.5;

/// Horizontal placement of a bar, in percent of the window span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Geometry {
    pub left: f64,
    pub width: f64,
}

impl Geometry {
    /// Right edge of the bar; may exceed 100.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Place a bar running from `start` through `end` (inclusive) inside `window`.
pub fn task_geometry(start: NaiveDate, end: NaiveDate, window: &Window) -> Geometry {
    let total_range = window.span_days();
    if total_range <= 0 {
        return Geometry::default();
    }
    let total_range = total_range as f64;

    let left = days_between(window.min_date, start) as f64 / total_range * 100.0;
    let width = days_between(start, pad_end(end)) as f64 / total_range * 100.0;

    if !left.is_finite() || !width.is_finite() {
        return Geometry::default();
    }

    Geometry {
        left: left.max(0.0),
        width: width.max(MIN_VISIBLE_WIDTH),
    }
}

impl Task {
    /// Bar geometry for this task; unusable dates count as `today`.
    pub fn geometry(&self, window: &Window, today: NaiveDate) -> Geometry {
        task_geometry(self.start_at(today), self.end_at(today), window)
    }
}
