use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    tracker::{
        data::TrackerData,
        entities::{Project, ProjectId, Session, Task, TaskId},
    },
    utils::percentage::{duration_percentage, Percentage},
};

use super::{
    rank_by,
    window::{filter_by_window, Window},
    Lookup, OrderedTotals, UNKNOWN_PROJECT,
};

/// Sum of the clamped durations of sessions accepted by `predicate`.
pub fn total_duration<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    now: DateTime<Utc>,
    predicate: impl Fn(&Session) -> bool,
) -> Duration {
    sessions
        .into_iter()
        .filter(|s| predicate(*s))
        .map(|s| s.duration(now))
        .fold(Duration::zero(), |acc, d| acc + d)
}

/// Time per task. Sessions of deleted tasks are left out.
pub fn per_task_totals<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    tasks: &[Task],
    now: DateTime<Utc>,
) -> HashMap<TaskId, Duration> {
    let lookup = Lookup::new(tasks, &[]);
    let mut totals = HashMap::new();
    for session in sessions {
        if lookup.task(session.task_id).is_none() {
            continue;
        }
        *totals.entry(session.task_id).or_insert_with(Duration::zero) += session.duration(now);
    }
    totals
}

/// Time per project name in the order projects first appear in `sessions`. Anything that
/// doesn't resolve lands in [UNKNOWN_PROJECT].
pub fn per_project_totals<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    tasks: &[Task],
    projects: &[Project],
    now: DateTime<Utc>,
) -> Vec<(String, Duration)> {
    let lookup = Lookup::new(tasks, projects);
    let mut totals = OrderedTotals::default();
    for session in sessions {
        totals.add(
            lookup.project_name(session.task_id).to_string(),
            session.duration(now),
        );
    }
    totals.into_vec()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub title: String,
    pub project: String,
    pub duration: Duration,
}

/// Ranked time per `(task title, project name)`. Tasks sharing a title inside one project are
/// reported together.
pub fn task_summary<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    tasks: &[Task],
    projects: &[Project],
    now: DateTime<Utc>,
) -> Vec<TaskSummary> {
    let lookup = Lookup::new(tasks, projects);
    let mut totals = OrderedTotals::default();
    for session in sessions {
        let Some(task) = lookup.task(session.task_id) else {
            continue;
        };
        let key = (
            task.title.clone(),
            lookup.project_name(session.task_id).to_string(),
        );
        totals.add(key, session.duration(now));
    }

    let mut summary: Vec<TaskSummary> = totals
        .into_vec()
        .into_iter()
        .map(|((title, project), duration)| TaskSummary {
            title,
            project,
            duration,
        })
        .collect();
    rank_by(&mut summary, |v| v.duration);
    summary
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskTotal {
    pub task_id: TaskId,
    pub title: String,
    pub duration: Duration,
}

/// Every task of the project in task order, including the ones with no time.
pub fn task_breakdown<'a>(
    project_id: ProjectId,
    sessions: impl IntoIterator<Item = &'a Session>,
    tasks: &[Task],
    now: DateTime<Utc>,
) -> Vec<TaskTotal> {
    let totals = per_task_totals(sessions, tasks, now);
    tasks
        .iter()
        .filter(|t| t.project_id == project_id)
        .map(|t| TaskTotal {
            task_id: t.id,
            title: t.title.clone(),
            duration: totals.get(&t.id).copied().unwrap_or_else(Duration::zero),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub name: String,
    /// `None` for [UNKNOWN_PROJECT] and names that no longer match a project.
    pub completed: Option<bool>,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    pub rows: Vec<ProjectRow>,
    pub total: Duration,
}

impl ProjectReport {
    pub fn top(&self) -> Option<&ProjectRow> {
        self.rows.first().filter(|r| r.duration > Duration::zero())
    }

    pub fn share(&self, row: &ProjectRow) -> Percentage {
        duration_percentage(row.duration, self.total)
    }
}

/// Ranked projects with tracked time.
pub fn project_report<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    tasks: &[Task],
    projects: &[Project],
    now: DateTime<Utc>,
) -> ProjectReport {
    let totals = per_project_totals(sessions, tasks, projects, now);
    let total = totals
        .iter()
        .fold(Duration::zero(), |acc, (_, d)| acc + *d);

    let mut rows: Vec<ProjectRow> = totals
        .into_iter()
        .map(|(name, duration)| {
            let completed = if name == UNKNOWN_PROJECT {
                None
            } else {
                projects.iter().find(|p| p.name == name).map(|p| p.completed)
            };
            ProjectRow {
                name,
                completed,
                duration,
            }
        })
        .collect();
    rank_by(&mut rows, |v| v.duration);

    ProjectReport { rows, total }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub day: Duration,
    pub week: Duration,
    pub month: Duration,
    pub active_tasks: usize,
}

impl Overview {
    /// Week total against every hour of a week.
    pub fn week_share(&self) -> Percentage {
        duration_percentage(self.week, Duration::hours(168))
    }

    /// Month total against a 30 day month.
    pub fn month_share(&self) -> Percentage {
        duration_percentage(self.month, Duration::hours(720))
    }
}

/// Day, week and month totals around `reference`.
pub fn overview<Tz: TimeZone>(
    data: &TrackerData,
    reference: &DateTime<Tz>,
    now: DateTime<Utc>,
) -> Overview {
    let total = |window| {
        let sessions = filter_by_window(&data.sessions, window, reference);
        total_duration(sessions, now, |_| true)
    };
    Overview {
        day: total(Window::Day),
        week: total(Window::Week),
        month: total(Window::Month),
        active_tasks: data.tasks.iter().filter(|t| t.is_running).count(),
    }
}
