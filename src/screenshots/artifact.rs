use std::{fmt::Display, path::Path};

use chrono::{DateTime, Utc};

use crate::utils::time::from_epoch_millis;

/// A parsed screenshot identifier, `<epoch-ms>-<label>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// The identifier as listed, directories stripped.
    pub file_name: String,
    /// `None` when the leading part isn't a usable millisecond timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Everything between the first `-` and the extension. May be empty.
    pub label: String,
}

impl ArtifactName {
    pub fn parse(identifier: &str) -> ArtifactName {
        let file_name = identifier
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(identifier)
            .to_string();
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => file_name.as_str(),
        };
        let (timestamp, label) = stem.split_once('-').unwrap_or((stem, ""));
        let timestamp = timestamp.parse::<i64>().ok().and_then(from_epoch_millis);
        let label = label.to_string();

        ArtifactName {
            file_name,
            timestamp,
            label,
        }
    }

    /// Project part of the label, the text before its first `-`.
    pub fn project_segment(&self) -> &str {
        self.label.split('-').next().unwrap_or_default()
    }
}

impl Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name)
    }
}

/// Label of a session as the capture side writes it: `<project>-<task>` with whitespace runs
/// replaced by `_`.
pub fn session_label(project: Option<&str>, task: Option<&str>) -> String {
    let raw = format!("{}-{}", project.unwrap_or("Unknown"), task.unwrap_or("Unknown"));
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Label reduced to what survives file naming: every character outside `[A-Za-z0-9]` becomes
/// `_`, runs of `_` collapse and case is ignored.
pub fn canonical_label(label: &str) -> String {
    let mut result = String::with_capacity(label.len());
    for c in label.chars() {
        let c = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '_'
        };
        if c == '_' && result.ends_with('_') {
            continue;
        }
        result.push(c);
    }
    result
}

pub fn labels_match(a: &str, b: &str) -> bool {
    canonical_label(a) == canonical_label(b)
}

/// File name for a capture of `label` taken at `at`.
pub fn capture_file_name(label: &str, at: DateTime<Utc>) -> String {
    let safe: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{safe}.png", at.timestamp_millis())
}

pub fn is_artifact_path(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
