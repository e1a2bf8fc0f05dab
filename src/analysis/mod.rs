//! Derived time. Everything here is a pure function of a snapshot, the current instant and a
//! reference date; nothing is cached and nothing fails. Sessions, tasks or projects that no
//! longer resolve are attributed to [UNKNOWN_PROJECT] or skipped, never reported as errors.

use std::{collections::HashMap, hash::Hash};

use chrono::Duration;

use crate::tracker::entities::{Project, ProjectId, Task, TaskId};

pub mod focus;
pub mod histogram;
pub mod history;
pub mod totals;
pub mod window;

pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Id based joins between tasks and projects.
pub struct Lookup<'a> {
    tasks: HashMap<TaskId, &'a Task>,
    projects: HashMap<ProjectId, &'a Project>,
}

impl<'a> Lookup<'a> {
    pub fn new(tasks: &'a [Task], projects: &'a [Project]) -> Self {
        Self {
            tasks: tasks.iter().map(|t| (t.id, t)).collect(),
            projects: projects.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&'a Task> {
        self.tasks.get(&id).copied()
    }

    pub fn project(&self, id: ProjectId) -> Option<&'a Project> {
        self.projects.get(&id).copied()
    }

    pub fn project_of_task(&self, id: TaskId) -> Option<&'a Project> {
        self.task(id).and_then(|t| self.project(t.project_id))
    }

    /// Name of the project owning the task, [UNKNOWN_PROJECT] when either link is broken.
    pub fn project_name(&self, id: TaskId) -> &'a str {
        self.project_of_task(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PROJECT)
    }
}

/// Sums durations per key while remembering the order in which keys showed up.
pub struct OrderedTotals<K> {
    entries: Vec<(K, Duration)>,
    index: HashMap<K, usize>,
}

impl<K> Default for OrderedTotals<K> {
    fn default() -> Self {
        Self {
            entries: vec![],
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> OrderedTotals<K> {
    pub fn add(&mut self, key: K, duration: Duration) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += duration,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, duration));
            }
        }
    }

    pub fn into_vec(self) -> Vec<(K, Duration)> {
        self.entries
    }
}

/// Sorts longest first. Equal durations keep their relative order.
pub fn rank_by<T>(items: &mut [T], duration: impl Fn(&T) -> Duration) {
    items.sort_by(|a, b| duration(b).cmp(&duration(a)));
}
