//! Predefined projects shipped with the binary.
//!
//! The catalog is a JSON object of project name to task list, embedded at
//! compile time from `data/projects.json`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::error;

use crate::error::SourceError;
use crate::task::Task;

const PROJECTS_JSON: &str = include_str!("../data/projects.json");

static CATALOG: OnceLock<BTreeMap<String, Vec<Task>>> = OnceLock::new();

/// The parsed catalog, parsed on first use.
fn catalog() -> &'static BTreeMap<String, Vec<Task>> {
    CATALOG.get_or_init(|| match serde_json::from_str(PROJECTS_JSON) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "embedded project catalog is invalid");
            BTreeMap::new()
        },
    })
}

/// Names of all predefined projects, sorted.
pub fn project_names() -> Vec<String> {
    catalog().keys().cloned().collect()
}

/// Task list of a predefined project.
pub fn get_project(name: &str) -> Option<Vec<Task>> {
    catalog().get(name).cloned()
}

/// Like [`get_project`], but reports the available names on a miss.
pub fn require_project(name: &str) -> Result<Vec<Task>, SourceError> {
    get_project(name).ok_or_else(|| SourceError::UnknownProject {
        name: name.to_string(),
        available: project_names(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog: BTreeMap<String, Vec<Task>> = serde_json::from_str(PROJECTS_JSON).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_catalog_is_parsed_once() {
        assert!(std::ptr::eq(catalog(), catalog()));
        assert_eq!(catalog().len(), 2);
        let mut tasks = get_project("gestores").unwrap();
        tasks.clear();
        assert!(!get_project("gestores").unwrap().is_empty());
    }

    #[test]
    fn test_project_names_are_sorted() {
        assert_eq!(project_names(), vec!["gestores", "milagro-1-palmira"]);
    }

    #[test]
    fn test_get_project() {
        let tasks = get_project("milagro-1-palmira").unwrap();
        assert_eq!(tasks.len(), 34);
        assert_eq!(tasks[0].team, "Migracion");
        assert!(get_project("missing").is_none());
    }

    #[test]
    fn test_catalog_dates_are_all_valid() {
        for name in project_names() {
            for t in get_project(&name).unwrap() {
                assert!(t.try_dates().is_ok(), "{name}: {}", t.title);
            }
        }
    }

    #[test]
    fn test_require_project_lists_alternatives() {
        let err = require_project("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("gestores"));
    }
}
