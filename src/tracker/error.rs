//! Failures the tracker reports to its callers.
//!
//! Data quality problems (dangling references, odd timestamps) are never errors: aggregation
//! degrades around them. Only the cases below reach the caller.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// A required text field was empty. The mutation was not applied.
    #[error("{field} cannot be empty")]
    Validation { field: &'static str },

    #[error("Storage failure for {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Import payload was not a JSON object. Nothing was applied.
    #[error("Invalid backup file: {0}")]
    ImportFormat(String),

    #[error("Screenshot capture failed: {0}")]
    Capture(String),

    #[error("Invalid artifact identifier: {0:?}")]
    InvalidArtifact(PathBuf),
}

impl TrackerError {
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        TrackerError::Storage {
            context: context.into(),
            source,
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
