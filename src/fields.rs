//! Enumerations and selector types for the timeline.
//!
//! This module defines the small closed sets the layout engine and its callers
//! agree on: zoom granularities, label locales, the project filter and the
//! output formats of the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Axis granularity for the timeline header.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Zoom {
    #[default]
    Week,
    Month,
    Quarter,
    Semester,
}

impl Zoom {
    /// The next coarser zoom level, wrapping around to weeks.
    pub fn next(self) -> Self {
        match self {
            Zoom::Week => Zoom::Month,
            Zoom::Month => Zoom::Quarter,
            Zoom::Quarter => Zoom::Semester,
            Zoom::Semester => Zoom::Week,
        }
    }

    /// The next finer zoom level, wrapping around to semesters.
    pub fn previous(self) -> Self {
        match self {
            Zoom::Week => Zoom::Semester,
            Zoom::Month => Zoom::Week,
            Zoom::Quarter => Zoom::Month,
            Zoom::Semester => Zoom::Quarter,
        }
    }

    /// Human-readable name of the zoom level in the given locale.
    pub fn display_name(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Zoom::Week, Locale::Es) => "Semanas",
            (Zoom::Month, Locale::Es) => "Meses",
            (Zoom::Quarter, Locale::Es) => "Trimestres",
            (Zoom::Semester, Locale::Es) => "Semestres",
            (Zoom::Week, Locale::En) => "Weeks",
            (Zoom::Month, Locale::En) => "Months",
            (Zoom::Quarter, Locale::En) => "Quarters",
            (Zoom::Semester, Locale::En) => "Semesters",
        }
    }
}

/// Language used for month names in axis labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Choose between the Spanish and English form of a UI string.
    pub fn pick<'a>(self, es: &'a str, en: &'a str) -> &'a str {
        match self {
            Locale::Es => es,
            Locale::En => en,
        }
    }
}

/// Output format for the non-interactive commands.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Which tasks feed the lane packer. The window is never affected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectFilter {
    #[default]
    All,
    Responsable(String),
}

impl ProjectFilter {
    /// Sentinel accepted on the command line for "no filter".
    pub const ALL_SENTINEL: &'static str = "all";

    /// Build a filter from user input; the sentinel (any case) and blank input mean `All`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(Self::ALL_SENTINEL) {
            ProjectFilter::All
        } else {
            ProjectFilter::Responsable(s.to_string())
        }
    }

    /// Whether a task with the given `responsable` value passes the filter.
    pub fn matches(&self, responsable: Option<&str>) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Responsable(name) => responsable == Some(name.as_str()),
        }
    }

    /// Label used in menus and status lines.
    pub fn label(&self) -> &str {
        match self {
            ProjectFilter::All => Self::ALL_SENTINEL,
            ProjectFilter::Responsable(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_cycles_through_all_levels() {
        let mut z = Zoom::Week;
        for _ in 0..4 {
            z = z.next();
        }
        assert_eq!(z, Zoom::Week);
        assert_eq!(Zoom::Week.previous(), Zoom::Semester);
        assert_eq!(Zoom::Quarter.next().previous(), Zoom::Quarter);
    }

    #[test]
    fn test_project_filter_parse() {
        assert_eq!(ProjectFilter::parse("all"), ProjectFilter::All);
        assert_eq!(ProjectFilter::parse(" ALL "), ProjectFilter::All);
        assert_eq!(ProjectFilter::parse(""), ProjectFilter::All);
        assert_eq!(
            ProjectFilter::parse("milagro-1"),
            ProjectFilter::Responsable("milagro-1".to_string())
        );
    }

    #[test]
    fn test_project_filter_matches() {
        let f = ProjectFilter::Responsable("ajustes".into());
        assert!(f.matches(Some("ajustes")));
        assert!(!f.matches(Some("novedades")));
        assert!(!f.matches(None));
        assert!(ProjectFilter::All.matches(None));
    }
}
