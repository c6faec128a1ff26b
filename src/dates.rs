//! Date normalisation and formatting.
//!
//! Every date in the timeline is a calendar date with no time of day and no
//! timezone. Input strings are split into explicit year/month/day components
//! instead of going through a locale-aware parser, so a date never shifts by a
//! day depending on where the chart is viewed.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use thiserror::Error;

use crate::fields::Locale;

/// Days added after a task's end date when it is drawn or packed.
///
/// Geometry and lane packing both go through [`pad_end`] so the rendered bar
/// and the overlap test always agree.
pub const RENDER_PAD_DAYS: i64 = 1;

const MONTHS_SHORT_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];
const MONTHS_LONG_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];
const MONTHS_SHORT_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_LONG_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Why a date string could not be normalised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("date is empty")]
    Empty,

    #[error("'{0}' is not in YYYY-MM-DD form")]
    Malformed(String),

    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),
}

/// Current calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string into a date, reporting why it failed.
pub fn try_parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() != 3 {
        return Err(DateError::Malformed(s.to_string()));
    }

    let year: i32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| DateError::Malformed(s.to_string()))?;
    let month: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| DateError::Malformed(s.to_string()))?;
    let day: u32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| DateError::Malformed(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::OutOfRange(s.to_string()))
}

/// Parse a date, substituting `fallback` when the string is unusable.
pub fn parse_date_or(s: &str, fallback: NaiveDate) -> NaiveDate {
    try_parse_date(s).unwrap_or(fallback)
}

/// Parse a date, falling back to today's date. Never fails.
///
/// The fallback hides bad input behind a plausible date; validation paths
/// should call [`try_parse_date`] instead.
pub fn parse_date(s: &str) -> NaiveDate {
    parse_date_or(s, today_utc())
}

/// The exclusive end of a task drawn from `start` to `end`.
pub fn pad_end(end: NaiveDate) -> NaiveDate {
    add_days(end, RENDER_PAD_DAYS)
}

/// Shift by whole days, saturating at the ends of the supported date range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let n = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(n).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(n).unwrap_or(NaiveDate::MIN)
    }
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Add calendar months, clamping the day to the end of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

/// Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    // Sunday goes back six days, Monday stays put.
    let weekday = date.weekday().num_days_from_monday() as i64;
    add_days(date, -weekday)
}

/// Format as `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Month name for a 0-based month index.
pub fn month_name(month0: u32, locale: Locale, short: bool) -> &'static str {
    let idx = (month0 % 12) as usize;
    match (locale, short) {
        (Locale::Es, true) => MONTHS_SHORT_ES[idx],
        (Locale::Es, false) => MONTHS_LONG_ES[idx],
        (Locale::En, true) => MONTHS_SHORT_EN[idx],
        (Locale::En, false) => MONTHS_LONG_EN[idx],
    }
}

/// Short form: `12 may`.
pub fn format_short_date(date: NaiveDate, locale: Locale) -> String {
    format!("{} {}", date.day(), month_name(date.month0(), locale, true))
}

/// Short form of a raw task date; unparseable input is returned as-is.
pub fn format_task_date(s: &str, locale: Locale) -> String {
    match try_parse_date(s) {
        Ok(date) => format_short_date(date, locale),
        Err(_) => s.to_string(),
    }
}

/// Month and year: `mayo 2025`.
pub fn format_month_year(date: NaiveDate, locale: Locale) -> String {
    format!("{} {}", month_name(date.month0(), locale, false), date.year())
}

/// Full date for summaries: `12 de mayo de 2025` / `12 May 2025`.
pub fn format_long_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Es => format!(
            "{} de {} de {}",
            date.day(),
            month_name(date.month0(), locale, false),
            date.year()
        ),
        Locale::En => format!(
            "{} {} {}",
            date.day(),
            month_name(date.month0(), locale, false),
            date.year()
        ),
    }
}

/// Week range label for the week starting at `week_start`.
///
/// `12-18 may` inside one month, `28 abr - 4 may` across two.
pub fn format_week_range(week_start: NaiveDate, locale: Locale) -> String {
    let week_end = add_days(week_start, 6);
    if week_start.month() != week_end.month() {
        format!(
            "{} {} - {} {}",
            week_start.day(),
            month_name(week_start.month0(), locale, true),
            week_end.day(),
            month_name(week_end.month0(), locale, true)
        )
    } else {
        format!(
            "{}-{} {}",
            week_start.day(),
            week_end.day(),
            month_name(week_start.month0(), locale, true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_valid_dates_round_trip() {
        for s in ["2025-05-12", "2024-02-29", "1999-12-31", "2026-01-01"] {
            assert_eq!(format_iso(parse_date(s)), s);
        }
    }

    #[test]
    fn test_parse_accepts_unpadded_components() {
        assert_eq!(try_parse_date("2025-5-1"), Ok(d(2025, 5, 1)));
    }

    #[test]
    fn test_try_parse_reports_errors() {
        assert_eq!(try_parse_date(""), Err(DateError::Empty));
        assert_eq!(try_parse_date("   "), Err(DateError::Empty));
        assert!(matches!(try_parse_date("2025/05/12"), Err(DateError::Malformed(_))));
        assert!(matches!(try_parse_date("2025-05"), Err(DateError::Malformed(_))));
        assert!(matches!(try_parse_date("2025-xx-12"), Err(DateError::Malformed(_))));
        assert!(matches!(try_parse_date("2025-13-01"), Err(DateError::OutOfRange(_))));
        assert!(matches!(try_parse_date("2025-02-30"), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_parse_falls_back_on_bad_input() {
        let fallback = d(2030, 1, 1);
        assert_eq!(parse_date_or("not a date", fallback), fallback);
        assert_eq!(parse_date_or("", fallback), fallback);
        assert_eq!(parse_date_or("2025-04-14", fallback), d(2025, 4, 14));
    }

    #[test]
    fn test_pad_end_adds_one_day() {
        assert_eq!(pad_end(d(2025, 4, 30)), d(2025, 5, 1));
    }

    #[test]
    fn test_day_shifts_saturate_at_range_ends() {
        assert_eq!(add_days(d(2025, 5, 12), -12), d(2025, 4, 30));
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -7), NaiveDate::MIN);
        assert_eq!(pad_end(NaiveDate::MAX), NaiveDate::MAX);
        assert!(start_of_week(NaiveDate::MIN) >= NaiveDate::MIN);
        let label = format_week_range(start_of_week(NaiveDate::MAX), Locale::En);
        assert!(label.ends_with("Dec"), "{label}");
    }

    #[test]
    fn test_start_of_week_is_monday() {
        // 2025-05-12 is a Monday.
        assert_eq!(start_of_week(d(2025, 5, 12)), d(2025, 5, 12));
        assert_eq!(start_of_week(d(2025, 5, 14)), d(2025, 5, 12));
        assert_eq!(start_of_week(d(2025, 5, 18)), d(2025, 5, 12));
        assert_eq!(start_of_week(d(2025, 5, 17)), d(2025, 5, 12));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2025, 11, 15), 3), d(2026, 2, 15));
    }

    #[test]
    fn test_week_range_labels() {
        assert_eq!(format_week_range(d(2025, 5, 12), Locale::Es), "12-18 may");
        assert_eq!(format_week_range(d(2025, 4, 28), Locale::Es), "28 abr - 4 may");
        assert_eq!(format_week_range(d(2025, 4, 28), Locale::En), "28 Apr - 4 May");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_short_date(d(2025, 5, 9), Locale::Es), "9 may");
        assert_eq!(format_month_year(d(2025, 9, 1), Locale::Es), "septiembre 2025");
        assert_eq!(format_month_year(d(2025, 9, 1), Locale::En), "September 2025");
        assert_eq!(format_long_date(d(2025, 5, 9), Locale::Es), "9 de mayo de 2025");
        assert_eq!(format_task_date("bogus", Locale::Es), "bogus");
    }
}
