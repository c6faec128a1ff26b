//! Error types for loading task lists and configuration.
//!
//! The layout engine itself never fails; these errors belong to the boundary
//! that reads files, parses JSON and looks up predefined projects.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a usable task list or colour configuration.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the JSON must be an array of tasks")]
    NotAnArray,

    #[error("invalid tasks: {}", .0.join("; "))]
    MissingFields(Vec<String>),

    #[error("unknown project '{name}' (available: {})", .available.join(", "))]
    UnknownProject { name: String, available: Vec<String> },

    #[error("invalid colour configuration in {path}: {source}")]
    Colors {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
