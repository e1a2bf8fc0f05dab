use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::tracker::entities::{ProjectId, Session, Task};

use super::{totals::total_duration, Lookup};

/// Sessions sharing a key, with their combined time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGroup<'a, K> {
    pub key: K,
    pub sessions: Vec<&'a Session>,
    pub total: Duration,
}

impl<'a, K> SessionGroup<'a, K> {
    fn new(key: K, sessions: Vec<&'a Session>, now: DateTime<Utc>) -> Self {
        let total = total_duration(sessions.iter().copied(), now, |_| true);
        Self {
            key,
            sessions,
            total,
        }
    }
}

/// Groups by the local date a session started on, newest date first.
pub fn group_by_date<'a, Tz: TimeZone>(
    sessions: impl IntoIterator<Item = &'a Session>,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<SessionGroup<'a, NaiveDate>> {
    let mut groups = BTreeMap::<NaiveDate, Vec<&'a Session>>::new();
    for session in sessions {
        let date = session.start_time.with_timezone(tz).date_naive();
        groups.entry(date).or_default().push(session);
    }

    groups
        .into_iter()
        .rev()
        .map(|(date, sessions)| SessionGroup::new(date, sessions, now))
        .collect()
}

/// Groups by project name in alphabetical order. Unresolved sessions share
/// [UNKNOWN_PROJECT](super::UNKNOWN_PROJECT).
pub fn group_by_project<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    lookup: &Lookup,
    now: DateTime<Utc>,
) -> Vec<SessionGroup<'a, String>> {
    let mut groups = BTreeMap::<String, Vec<&'a Session>>::new();
    for session in sessions {
        groups
            .entry(lookup.project_name(session.task_id).to_string())
            .or_default()
            .push(session);
    }

    groups
        .into_iter()
        .map(|(name, sessions)| SessionGroup::new(name, sessions, now))
        .collect()
}

/// Sessions of every task in the project, most recently started first.
pub fn project_sessions<'a>(
    project_id: ProjectId,
    sessions: &'a [Session],
    tasks: &[Task],
) -> Vec<&'a Session> {
    let lookup = Lookup::new(tasks, &[]);
    let mut result: Vec<&Session> = sessions
        .iter()
        .filter(|s| lookup.task(s.task_id).is_some_and(|t| t.project_id == project_id))
        .collect();
    result.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    result
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::{
        analysis::{Lookup, UNKNOWN_PROJECT},
        tracker::entities::{Project, ProjectId, Session, SessionId, Task, TaskId},
    };

    use super::{group_by_date, group_by_project, project_sessions};

    fn session(id: i64, task: i64, day: u32, hour: u32) -> Session {
        let start_time = Utc.with_ymd_and_hms(2024, 4, day, hour, 0, 0).unwrap();
        Session {
            id: SessionId(id),
            task_id: TaskId(task),
            start_time,
            end_time: Some(start_time + Duration::minutes(30)),
        }
    }

    #[test]
    fn dates_newest_first() {
        let sessions = [session(1, 1, 3, 10), session(2, 1, 5, 10), session(3, 1, 3, 22)];
        let groups = group_by_date(&sessions, &Utc, Utc::now());

        let keys: Vec<NaiveDate> = groups.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            [
                NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            ]
        );
        assert_eq!(groups[1].sessions.len(), 2);
        assert_eq!(groups[1].total, Duration::hours(1));

        // 22:00 UTC is past midnight two hours east
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let groups = group_by_date(&sessions, &east, Utc::now());
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn projects_alphabetical_with_unknown() {
        let projects = [
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
        ];
        let tasks = [
            Task {
                id: TaskId(10),
                project_id: ProjectId(1),
                title: "Draft".into(),
                is_running: false,
            },
            Task {
                id: TaskId(11),
                project_id: ProjectId(2),
                title: "Sketch".into(),
                is_running: false,
            },
        ];
        let sessions = [session(1, 10, 3, 10), session(2, 11, 3, 11), session(3, 99, 3, 12)];
        let lookup = Lookup::new(&tasks, &projects);

        let groups = group_by_project(&sessions, &lookup, Utc::now());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["Art", UNKNOWN_PROJECT, "Writing"]);

        let recent = project_sessions(ProjectId(1), &sessions, &tasks);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, SessionId(1));
    }
}
