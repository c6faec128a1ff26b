//! Loading task lists from JSON.
//!
//! Input is a JSON array of task objects. Structure is checked item by item
//! before deserialising so the user gets every problem at once, e.g.
//! `task #3: missing startDate, team`.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog;
use crate::dates::{format_iso, parse_date, try_parse_date};
use crate::error::SourceError;
use crate::task::Task;

/// Fields that must be present and non-empty.
const REQUIRED_FIELDS: [&str; 5] = ["id", "title", "startDate", "endDate", "team"];
/// Fields that only need to be present.
const PRESENT_FIELDS: [&str; 2] = ["description", "progress"];

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn missing_fields(item: &Value) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for field in REQUIRED_FIELDS {
        if !item.get(field).is_some_and(is_truthy) {
            missing.push(field);
        }
    }
    for field in PRESENT_FIELDS {
        if item.get(field).is_none() {
            missing.push(field);
        }
    }
    missing
}

/// Parse and structurally validate a JSON task list.
pub fn parse_tasks(text: &str) -> Result<Vec<Task>, SourceError> {
    if text.trim().is_empty() {
        return Err(SourceError::Empty);
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(SourceError::NotAnArray);
    };

    let problems: Vec<String> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let missing = missing_fields(item);
            if missing.is_empty() {
                None
            } else {
                Some(format!("task #{}: missing {}", i + 1, missing.join(", ")))
            }
        })
        .collect();
    if !problems.is_empty() {
        return Err(SourceError::MissingFields(problems));
    }

    let tasks = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Task>, _>>()?;
    Ok(tasks)
}

/// Read a task list from a file, or from stdin when `path` is `-`.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, SourceError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };
    parse_tasks(&text)
}

/// Where a task list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSource {
    File(PathBuf),
    Project(String),
    Example,
}

impl TaskSource {
    /// Pick the source from the command line. `--data` and `--project` are exclusive.
    pub fn from_args(data: Option<PathBuf>, project: Option<String>) -> Result<Option<Self>, String> {
        match (data, project) {
            (Some(_), Some(_)) => Err("--data and --project cannot be used together".to_string()),
            (Some(path), None) => Ok(Some(TaskSource::File(path))),
            (None, Some(name)) => Ok(Some(TaskSource::Project(name))),
            (None, None) => Ok(None),
        }
    }

    /// Load the task list.
    pub fn load(&self) -> Result<Vec<Task>, SourceError> {
        match self {
            TaskSource::File(path) => load_tasks(path),
            TaskSource::Project(name) => catalog::require_project(name),
            TaskSource::Example => Ok(example_tasks()),
        }
    }

    /// Name shown in status lines and messages.
    pub fn name(&self) -> String {
        match self {
            TaskSource::File(path) if path.as_os_str() == "-" => "<stdin>".to_string(),
            TaskSource::File(path) => path.display().to_string(),
            TaskSource::Project(name) => name.clone(),
            TaskSource::Example => "example".to_string(),
        }
    }
}

/// Dates that would silently fall back to today, one message per problem.
pub fn validate_dates(tasks: &[Task]) -> Vec<String> {
    let mut problems = Vec::new();
    for (i, t) in tasks.iter().enumerate() {
        for (field, raw) in [("startDate", &t.start_date), ("endDate", &t.end_date)] {
            if let Err(e) = try_parse_date(raw) {
                problems.push(format!(
                    "task #{} ({}): {field} {e}, drawn as {}",
                    i + 1,
                    t.title,
                    format_iso(parse_date(raw))
                ));
            }
        }
        if let Ok((start, end)) = t.try_dates() {
            if start > end {
                problems.push(format!(
                    "task #{} ({}): startDate is after endDate",
                    i + 1,
                    t.title
                ));
            }
        }
    }
    problems
}

/// Small sample list for trying the tool out.
pub fn example_tasks() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Análisis inicial".to_string(),
            start_date: "2025-05-01".to_string(),
            end_date: "2025-05-15".to_string(),
            team: "Migración".to_string(),
            description: "Evaluación de sistemas".to_string(),
            progress: 100.0,
            responsable: Some("Ana Gómez".to_string()),
        },
        Task {
            id: 2,
            title: "Desarrollo de componentes".to_string(),
            start_date: "2025-05-10".to_string(),
            end_date: "2025-05-30".to_string(),
            team: "Entidad".to_string(),
            description: "Implementación de módulos principales".to_string(),
            progress: 50.0,
            responsable: Some("Carlos Ruiz".to_string()),
        },
    ]
}
