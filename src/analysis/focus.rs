use std::cmp::Ordering;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    tracker::{
        data::TrackerData,
        entities::{Session, Task},
    },
    utils::percentage::{duration_percentage, Percentage},
};

use super::{
    totals::total_duration,
    window::{filter_by_window, Window},
    Lookup,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RunningTask<'a> {
    pub task: &'a Task,
    pub project: &'a str,
    pub session: Option<&'a Session>,
    pub elapsed: Duration,
}

pub fn running_task(data: &TrackerData, now: DateTime<Utc>) -> Option<RunningTask<'_>> {
    let task = data.running_task()?;
    let lookup = Lookup::new(&data.tasks, &data.projects);
    let session = data
        .sessions
        .iter()
        .find(|s| s.is_open() && s.task_id == task.id);
    Some(RunningTask {
        task,
        project: lookup.project_name(task.id),
        session,
        elapsed: session.map(|s| s.duration(now)).unwrap_or_else(Duration::zero),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastStopped<'a> {
    pub session: &'a Session,
    /// `None` when imported data references a task that doesn't exist.
    pub task: Option<&'a Task>,
}

/// The session that ended last.
pub fn last_stopped_task(data: &TrackerData) -> Option<LastStopped<'_>> {
    let session = data
        .sessions
        .iter()
        .filter(|s| s.end_time.is_some())
        .max_by_key(|s| s.end_time)?;
    Some(LastStopped {
        session,
        task: data.task(session.task_id),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub worked: Duration,
    pub goal: Duration,
    pub progress: Percentage,
}

impl GoalProgress {
    pub fn achieved(&self) -> bool {
        self.goal > Duration::zero() && self.worked >= self.goal
    }
}

/// Time tracked on the reference day against the daily goal. Progress is capped at 100%.
pub fn daily_goal_progress<Tz: TimeZone>(
    data: &TrackerData,
    reference: &DateTime<Tz>,
    now: DateTime<Utc>,
) -> GoalProgress {
    let today = filter_by_window(&data.sessions, Window::Day, reference);
    let worked = total_duration(today, now, |_| true);

    let goal_ms = data.settings.daily_goal * 3_600_000.;
    let goal = if goal_ms.is_finite() && goal_ms > 0. {
        Duration::milliseconds(goal_ms as i64)
    } else {
        Duration::zero()
    };

    GoalProgress {
        worked,
        goal,
        progress: duration_percentage(worked, goal).capped(),
    }
}

/// Order of the dashboard task list: the running task, then the most recently active, then by
/// project name.
pub fn task_order(data: &TrackerData) -> Vec<&Task> {
    let lookup = Lookup::new(&data.tasks, &data.projects);
    let last_activity = |task: &Task| {
        data.sessions
            .iter()
            .filter(|s| s.task_id == task.id)
            .map(|s| s.end_time.unwrap_or(s.start_time))
            .max()
    };

    let mut tasks: Vec<&Task> = data.tasks.iter().collect();
    tasks.sort_by(|a, b| {
        b.is_running
            .cmp(&a.is_running)
            .then_with(|| last_activity(b).cmp(&last_activity(a)))
            .then_with(|| match (lookup.project_of_task(a.id), lookup.project_of_task(b.id)) {
                (Some(x), Some(y)) => x.name.cmp(&y.name),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            })
    });
    tasks
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::tracker::{
        data::TrackerData,
        entities::{Project, ProjectId, Session, SessionId, Task, TaskId},
        settings::Settings,
    };

    use super::{daily_goal_progress, last_stopped_task, running_task, task_order};

    fn data() -> TrackerData {
        let start = Utc.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap();
        TrackerData {
            projects: vec![
                Project {
                    id: ProjectId(1),
                    name: "Writing".into(),
                    completed: false,
                },
                Project {
                    id: ProjectId(2),
                    name: "Art".into(),
                    completed: false,
                },
            ],
            tasks: vec![
                Task {
                    id: TaskId(10),
                    project_id: ProjectId(1),
                    title: "Draft".into(),
                    is_running: false,
                },
                Task {
                    id: TaskId(11),
                    project_id: ProjectId(1),
                    title: "Edit".into(),
                    is_running: true,
                },
                Task {
                    id: TaskId(12),
                    project_id: ProjectId(2),
                    title: "Sketch".into(),
                    is_running: false,
                },
                Task {
                    id: TaskId(13),
                    project_id: ProjectId(1),
                    title: "Idea".into(),
                    is_running: false,
                },
            ],
            sessions: vec![
                Session {
                    id: SessionId(1),
                    task_id: TaskId(10),
                    start_time: start,
                    end_time: Some(start + Duration::hours(2)),
                },
                Session {
                    id: SessionId(2),
                    task_id: TaskId(12),
                    start_time: start + Duration::hours(2),
                    end_time: Some(start + Duration::hours(3)),
                },
                Session {
                    id: SessionId(3),
                    task_id: TaskId(11),
                    start_time: start + Duration::hours(3),
                    end_time: None,
                },
            ],
            settings: Settings {
                daily_goal: 4.,
                ..Default::default()
            },
        }
    }

    #[test]
    fn focus_status() {
        let data = data();
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 30, 0).unwrap();

        let running = running_task(&data, now).unwrap();
        assert_eq!(running.task.id, TaskId(11));
        assert_eq!(running.project, "Writing");
        assert_eq!(running.elapsed, Duration::minutes(30));

        let last = last_stopped_task(&data).unwrap();
        assert_eq!(last.session.id, SessionId(2));
        assert_eq!(last.task.unwrap().title, "Sketch");
    }

    #[test]
    fn goal_is_capped() {
        let data = data();
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        let progress = daily_goal_progress(&data, &now, now);
        assert_eq!(progress.worked, Duration::hours(3));
        assert_eq!(*progress.progress, 75.);
        assert!(!progress.achieved());

        let later = now + Duration::hours(3);
        let progress = daily_goal_progress(&data, &later, later);
        assert_eq!(*progress.progress, 100.);
        assert!(progress.achieved());
    }

    #[test]
    fn zero_goal_never_divides() {
        let mut data = data();
        data.settings.daily_goal = 0.;
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        let progress = daily_goal_progress(&data, &now, now);
        assert_eq!(*progress.progress, 0.);
        assert!(!progress.achieved());
    }

    #[test]
    fn running_task_is_listed_first() {
        let data = data();
        let order: Vec<i64> = task_order(&data).iter().map(|t| t.id.0).collect();
        assert_eq!(order, [11, 12, 10, 13]);
    }
}
