//! Task data structure.
//!
//! This module defines the `Task` record that every part of the timeline consumes.
//! Tasks are immutable inputs: the layout engine never changes them, it only
//! derives positions and lanes from them on every pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_date_or, try_parse_date, DateError};

/// A scheduled piece of work shown as one bar on the chart.
///
/// `id` is not required to be unique; it is only used to key selection.
/// Dates are kept exactly as supplied (`YYYY-MM-DD`) and normalised when a
/// layout is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub team: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
}

impl Task {
    /// Start date with an explicit fallback for unusable strings.
    pub fn start_at(&self, fallback: NaiveDate) -> NaiveDate {
        parse_date_or(&self.start_date, fallback)
    }

    /// End date with an explicit fallback for unusable strings.
    pub fn end_at(&self, fallback: NaiveDate) -> NaiveDate {
        parse_date_or(&self.end_date, fallback)
    }

    /// Strictly parsed `(start, end)`, for validation.
    pub fn try_dates(&self) -> Result<(NaiveDate, NaiveDate), DateError> {
        Ok((try_parse_date(&self.start_date)?, try_parse_date(&self.end_date)?))
    }

    /// Progress clamped to 0–100; NaN counts as 0.
    pub fn clamped_progress(&self) -> f64 {
        if self.progress.is_nan() {
            0.0
        } else {
            self.progress.clamp(0.0, 100.0)
        }
    }

    /// Non-empty `responsable` value, if any.
    pub fn responsable(&self) -> Option<&str> {
        self.responsable.as_deref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn task(id: u64, start: &str, end: &str, team: &str) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        start_date: start.to_string(),
        end_date: end.to_string(),
        team: team.to_string(),
        description: String::new(),
        progress: 0.0,
        responsable: None,
    }
}
