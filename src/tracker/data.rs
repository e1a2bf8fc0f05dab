use std::{ops::Deref, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::{
    entities::{Project, ProjectId, Session, SessionId, Task, TaskId},
    error::{TrackerError, TrackerResult},
    settings::Settings,
};

/// Everything the tracker owns. Relations are plain ids; joins happen in
/// [analysis](crate::analysis).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerData {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub sessions: Vec<Session>,
    pub settings: Settings,
}

impl TrackerData {
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn open_session(&self) -> Option<&Session> {
        self.sessions.iter().find(|s| s.is_open())
    }

    pub fn running_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_running)
    }

    pub fn project_tasks(&self, project: ProjectId) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.project_id == project)
    }

    /// Ids of every entity, used to keep freshly generated ids unique.
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        let projects = self.projects.iter().map(|p| p.id.0);
        let tasks = self.tasks.iter().map(|t| t.id.0);
        let sessions = self.sessions.iter().map(|s| s.id.0);
        projects.chain(tasks).chain(sessions)
    }

    /// Restores the single running timer invariant on data that came from outside: only the
    /// most recently started open session stays open, and `is_running` is recomputed from it.
    /// Returns whether anything changed.
    pub fn normalize(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        let keep_open = self
            .sessions
            .iter()
            .filter(|s| s.is_open())
            .max_by_key(|s| s.start_time)
            .map(|s| s.id);

        for session in self.sessions.iter_mut() {
            if session.is_open() && Some(session.id) != keep_open {
                warn!("Closing stray open session {}", session.id);
                session.end_time = Some(now.max(session.start_time));
                changed = true;
            }
        }

        let owner = keep_open
            .and_then(|id| self.session(id))
            .map(|s| s.task_id);
        for task in self.tasks.iter_mut() {
            let running = Some(task.id) == owner;
            if task.is_running != running {
                task.is_running = running;
                changed = true;
            }
        }

        if changed {
            info!("Normalized running state");
        }
        changed
    }
}

/// Immutable view of [TrackerData] at some version. Cloning is cheap and the view never
/// changes, even while the tracker keeps mutating.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    data: Arc<TrackerData>,
}

impl Snapshot {
    pub(super) fn new(version: u64, data: Arc<TrackerData>) -> Self {
        Self { version, data }
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Deref for Snapshot {
    type Target = TrackerData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Reads a JSON array entry by entry. Entries that don't fit the entity shape are skipped, a
/// value that isn't an array yields an empty collection.
pub fn parse_collection<T: DeserializeOwned>(key: &str, value: Value) -> Vec<T> {
    let Value::Array(entries) = value else {
        warn!("Expected {key} to be an array, using an empty collection");
        return vec![];
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Skipping malformed entry in {key}: {e}");
                None
            }
        })
        .collect()
}

/// The document exchanged by import and export. Absent keys mean "leave as is" on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<Session>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl DataBundle {
    /// Parses an import document. Anything but a JSON object is rejected as a whole; inside
    /// the object each collection is read leniently.
    pub fn from_json(text: &str) -> TrackerResult<DataBundle> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TrackerError::ImportFormat(e.to_string()))?;
        let Value::Object(mut map) = value else {
            return Err(TrackerError::ImportFormat(
                "expected a JSON object at the top level".into(),
            ));
        };

        Ok(DataBundle {
            projects: map
                .remove("projects")
                .map(|v| parse_collection("projects", v)),
            tasks: map.remove("tasks").map(|v| parse_collection("tasks", v)),
            sessions: map
                .remove("sessions")
                .map(|v| parse_collection("sessions", v)),
            settings: map.remove("settings").map(|v| Settings::from_value(&v)),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_none()
            && self.tasks.is_none()
            && self.sessions.is_none()
            && self.settings.is_none()
    }
}

impl From<&TrackerData> for DataBundle {
    fn from(data: &TrackerData) -> Self {
        DataBundle {
            projects: Some(data.projects.clone()),
            tasks: Some(data.tasks.clone()),
            sessions: Some(data.sessions.clone()),
            settings: Some(data.settings.clone()),
        }
    }
}
