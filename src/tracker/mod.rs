//! Owner of the canonical projects, tasks and sessions.
//!
//! [Tracker] mutations are synchronous. Each one that changes something swaps in a new
//! [TrackerData] copy-on-write, bumps the version, notifies [subscribers](Tracker::subscribe)
//! and hands the new [Snapshot] to a [SnapshotSink] (normally the
//! [persistence module](crate::persistence::PersistenceModule)).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::utils::clock::Clock;

pub mod data;
pub mod entities;
pub mod error;
pub mod ids;
pub mod settings;

use data::{DataBundle, Snapshot, TrackerData};
use entities::{Project, ProjectId, Session, SessionId, Task, TaskId};
use error::{TrackerError, TrackerResult};
use ids::IdGenerator;
use settings::Settings;

/// Receiver of every committed snapshot.
pub trait SnapshotSink: Send + Sync {
    fn submit(&self, snapshot: Snapshot);
}

impl SnapshotSink for mpsc::UnboundedSender<Snapshot> {
    fn submit(&self, snapshot: Snapshot) {
        let version = snapshot.version();
        if self.send(snapshot).is_err() {
            warn!("Persistence is gone, snapshot {version} will not be saved");
        }
    }
}

pub struct Tracker {
    data: Arc<TrackerData>,
    version: u64,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    sink: Box<dyn SnapshotSink>,
    version_sender: watch::Sender<u64>,
}

impl Tracker {
    /// Takes ownership of `data`. Stored data that breaks the single running timer invariant
    /// is repaired right away and the repaired state is submitted.
    pub fn new(mut data: TrackerData, clock: Arc<dyn Clock>, sink: Box<dyn SnapshotSink>) -> Self {
        let repaired = data.normalize(clock.time());

        let mut ids = IdGenerator::default();
        ids.observe_all(data.ids());

        let (version_sender, _) = watch::channel(0);
        let mut tracker = Self {
            data: Arc::new(data),
            version: 0,
            ids,
            clock,
            sink,
            version_sender,
        };
        if repaired {
            tracker.publish();
        }
        tracker
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version, self.data.clone())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Receiver that observes the version after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_sender.subscribe()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    fn publish(&mut self) {
        self.version += 1;
        debug!("Committing version {}", self.version);
        self.sink.submit(self.snapshot());
        self.version_sender.send_replace(self.version);
    }

    fn data_mut(&mut self) -> &mut TrackerData {
        Arc::make_mut(&mut self.data)
    }

    pub fn add_project(&mut self, name: &str) -> TrackerResult<ProjectId> {
        let name = non_empty(name, "Project name")?;
        let id = ProjectId(self.ids.next(self.clock.time()));
        self.data_mut().projects.push(Project {
            id,
            name,
            completed: false,
        });
        info!("Added project {id}");
        self.publish();
        Ok(id)
    }

    pub fn add_task(&mut self, project_id: ProjectId, title: &str) -> TrackerResult<TaskId> {
        let title = non_empty(title, "Task title")?;
        if self.data.project(project_id).is_none() {
            warn!("Adding task to unknown project {project_id}");
        }
        let id = TaskId(self.ids.next(self.clock.time()));
        self.data_mut().tasks.push(Task {
            id,
            project_id,
            title,
            is_running: false,
        });
        info!("Added task {id} to project {project_id}");
        self.publish();
        Ok(id)
    }

    /// Makes `task_id` the running task: whatever was open is closed now and a new session
    /// starts. Returns the new session, or `None` when the task doesn't exist.
    pub fn start_session(&mut self, task_id: TaskId) -> Option<SessionId> {
        if task_id.0 == 0 {
            info!("Ignoring start without a task");
            return None;
        }
        if self.data.task(task_id).is_none() {
            warn!("Ignoring start of unknown task {task_id}");
            return None;
        }

        let now = self.clock.time();
        let id = SessionId(self.ids.next(now));
        let data = self.data_mut();
        close_open_sessions(data, now, |_| true);
        data.sessions.push(Session {
            id,
            task_id,
            start_time: now,
            end_time: None,
        });
        for task in data.tasks.iter_mut() {
            task.is_running = task.id == task_id;
        }
        info!("Started session {id} for task {task_id}");
        self.publish();
        Some(id)
    }

    /// Closes the open session of `task_id`. Returns whether anything was running.
    pub fn stop_session(&mut self, task_id: TaskId) -> bool {
        let has_open = self
            .data
            .sessions
            .iter()
            .any(|s| s.is_open() && s.task_id == task_id);
        let flagged = self.data.task(task_id).is_some_and(|t| t.is_running);
        if !has_open && !flagged {
            debug!("Task {task_id} is not running");
            return false;
        }

        let now = self.clock.time();
        let data = self.data_mut();
        close_open_sessions(data, now, |s| s.task_id == task_id);
        if let Some(task) = data.tasks.iter_mut().find(|t| t.id == task_id) {
            task.is_running = false;
        }
        info!("Stopped task {task_id}");
        self.publish();
        true
    }

    /// Closes every open session. Returns how many were closed; calling it again is a no-op.
    pub fn stop_all_sessions(&mut self) -> usize {
        let open = self.data.sessions.iter().filter(|s| s.is_open()).count();
        let flagged = self.data.tasks.iter().any(|t| t.is_running);
        if open == 0 && !flagged {
            return 0;
        }

        let now = self.clock.time();
        let data = self.data_mut();
        close_open_sessions(data, now, |_| true);
        for task in data.tasks.iter_mut() {
            task.is_running = false;
        }
        info!("Stopped {open} running sessions");
        self.publish();
        open
    }

    /// Removes the project with its tasks and their sessions.
    pub fn delete_project(&mut self, id: ProjectId) -> bool {
        if self.data.project(id).is_none() {
            return false;
        }
        let data = self.data_mut();
        let tasks: Vec<TaskId> = data.project_tasks(id).map(|t| t.id).collect();
        data.projects.retain(|p| p.id != id);
        data.tasks.retain(|t| t.project_id != id);
        data.sessions.retain(|s| !tasks.contains(&s.task_id));
        info!("Deleted project {id} with {} tasks", tasks.len());
        self.publish();
        true
    }

    /// Removes the task with its sessions.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        if self.data.task(id).is_none() {
            return false;
        }
        let data = self.data_mut();
        data.tasks.retain(|t| t.id != id);
        data.sessions.retain(|s| s.task_id != id);
        info!("Deleted task {id}");
        self.publish();
        true
    }

    pub fn delete_session(&mut self, id: SessionId) -> bool {
        let Some(session) = self.data.session(id).cloned() else {
            return false;
        };
        let data = self.data_mut();
        data.sessions.retain(|s| s.id != id);
        if session.is_open() {
            if let Some(task) = data.tasks.iter_mut().find(|t| t.id == session.task_id) {
                task.is_running = false;
            }
        }
        info!("Deleted session {id}");
        self.publish();
        true
    }

    /// Copies the project and its tasks under new ids. Sessions stay with the original.
    pub fn duplicate_project(&mut self, id: ProjectId) -> Option<ProjectId> {
        let source = self.data.project(id)?.clone();
        let now = self.clock.time();
        let copy_id = ProjectId(self.ids.next(now));
        let tasks: Vec<Task> = self
            .data
            .project_tasks(id)
            .map(|t| Task {
                id: TaskId(self.ids.next(now)),
                project_id: copy_id,
                title: t.title.clone(),
                is_running: false,
            })
            .collect();

        let data = self.data_mut();
        data.projects.push(Project {
            id: copy_id,
            name: format!("{} (Copy)", source.name),
            completed: false,
        });
        data.tasks.extend(tasks);
        info!("Duplicated project {id} as {copy_id}");
        self.publish();
        Some(copy_id)
    }

    pub fn rename_project(&mut self, id: ProjectId, name: &str) -> TrackerResult<bool> {
        let name = non_empty(name, "Project name")?;
        match self.data.project(id) {
            None => return Ok(false),
            Some(p) if p.name == name => return Ok(true),
            Some(_) => {}
        }
        if let Some(project) = self.data_mut().projects.iter_mut().find(|p| p.id == id) {
            project.name = name;
        }
        self.publish();
        Ok(true)
    }

    pub fn rename_task(&mut self, id: TaskId, title: &str) -> TrackerResult<bool> {
        let title = non_empty(title, "Task title")?;
        match self.data.task(id) {
            None => return Ok(false),
            Some(t) if t.title == title => return Ok(true),
            Some(_) => {}
        }
        if let Some(task) = self.data_mut().tasks.iter_mut().find(|t| t.id == id) {
            task.title = title;
        }
        self.publish();
        Ok(true)
    }

    pub fn complete_project(&mut self, id: ProjectId) -> bool {
        self.set_completed(id, true)
    }

    pub fn reopen_project(&mut self, id: ProjectId) -> bool {
        self.set_completed(id, false)
    }

    fn set_completed(&mut self, id: ProjectId, completed: bool) -> bool {
        match self.data.project(id) {
            None => return false,
            Some(p) if p.completed == completed => return true,
            Some(_) => {}
        }
        if let Some(project) = self.data_mut().projects.iter_mut().find(|p| p.id == id) {
            project.completed = completed;
        }
        self.publish();
        true
    }

    /// Bulk replacement used by import. Collections present in the bundle replace the current
    /// ones, absent ones are kept.
    pub fn replace_all_data(&mut self, bundle: DataBundle) {
        if bundle.is_empty() {
            info!("Import contained nothing to replace");
            return;
        }
        let now = self.clock.time();
        let data = self.data_mut();
        if let Some(projects) = bundle.projects {
            data.projects = projects;
        }
        if let Some(tasks) = bundle.tasks {
            data.tasks = tasks;
        }
        if let Some(sessions) = bundle.sessions {
            data.sessions = sessions;
        }
        if let Some(settings) = bundle.settings {
            data.settings = settings;
        }
        data.normalize(now);
        let taken: Vec<i64> = data.ids().collect();
        self.ids.observe_all(taken);
        info!("Replaced tracked data");
        self.publish();
    }

    /// Empties projects, tasks and sessions. Settings are kept.
    pub fn clear_all_data(&mut self) {
        let data = self.data_mut();
        data.projects.clear();
        data.tasks.clear();
        data.sessions.clear();
        info!("Cleared all tracked data");
        self.publish();
    }

    pub fn update_settings(&mut self, settings: Settings) {
        if self.data.settings == settings {
            return;
        }
        self.data_mut().settings = settings;
        self.publish();
    }

    pub fn reset_settings(&mut self) {
        self.update_settings(Settings::default());
    }
}

fn non_empty(value: &str, field: &'static str) -> TrackerResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrackerError::Validation { field });
    }
    Ok(value.to_string())
}

fn close_open_sessions(
    data: &mut TrackerData,
    now: DateTime<Utc>,
    filter: impl Fn(&Session) -> bool,
) -> usize {
    let mut closed = 0;
    for session in data
        .sessions
        .iter_mut()
        .filter(|s| s.is_open() && filter(s))
    {
        session.end_time = Some(now.max(session.start_time));
        closed += 1;
    }
    closed
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use crate::utils::clock::test_clock::ManualClock;

    use super::{
        data::{DataBundle, Snapshot, TrackerData},
        entities::{ProjectId, Session, SessionId, Task, TaskId},
        error::TrackerError,
        settings::Settings,
        Tracker,
    };

    fn tracker_with(data: TrackerData) -> (Tracker, ManualClock, UnboundedReceiver<Snapshot>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 5, 9, 0, 0).unwrap());
        let (sender, receiver) = mpsc::unbounded_channel();
        let tracker = Tracker::new(data, Arc::new(clock.clone()), Box::new(sender));
        (tracker, clock, receiver)
    }

    fn tracker() -> (Tracker, ManualClock, UnboundedReceiver<Snapshot>) {
        tracker_with(TrackerData::default())
    }

    fn assert_single_runner(tracker: &Tracker) {
        let snapshot = tracker.snapshot();
        let open: Vec<&Session> = snapshot.sessions.iter().filter(|s| s.is_open()).collect();
        assert!(open.len() <= 1);
        for task in snapshot.tasks.iter() {
            let owns_open = open.iter().any(|s| s.task_id == task.id);
            assert_eq!(task.is_running, owns_open, "task {}", task.id);
        }
    }

    #[test]
    fn at_most_one_task_runs() {
        let (mut tracker, clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let a = tracker.add_task(project, "Draft").unwrap();
        let b = tracker.add_task(project, "Edit").unwrap();

        for task in [a, b, a, a, b] {
            tracker.start_session(task);
            clock.advance(Duration::minutes(3));
            assert_single_runner(&tracker);
        }
        tracker.stop_session(b);
        assert_single_runner(&tracker);
        assert!(tracker.snapshot().running_task().is_none());
    }

    #[test]
    fn switching_closes_previous_session() {
        let (mut tracker, clock, _rx) = tracker();
        let writing = tracker.add_project("Writing").unwrap();
        let reading = tracker.add_project("Reading").unwrap();
        let a = tracker.add_task(writing, "Draft").unwrap();
        let b = tracker.add_task(reading, "Papers").unwrap();

        let started = tracker.now();
        let first = tracker.start_session(a).unwrap();
        clock.advance(Duration::seconds(600));
        let second = tracker.start_session(b).unwrap();

        let snapshot = tracker.snapshot();
        let closed = snapshot.session(first).unwrap();
        assert_eq!(closed.start_time, started);
        assert_eq!(closed.end_time, Some(started + Duration::seconds(600)));
        assert_eq!(closed.duration(tracker.now()), Duration::seconds(600));

        let open = snapshot.open_session().unwrap();
        assert_eq!(open.id, second);
        assert_eq!(open.task_id, b);
        assert_eq!(open.start_time, started + Duration::seconds(600));
        assert!(!snapshot.task(a).unwrap().is_running);
        assert!(snapshot.task(b).unwrap().is_running);
    }

    #[test]
    fn one_hour_session_is_recorded() {
        let (mut tracker, clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let task = tracker.add_task(project, "Draft").unwrap();
        let session = tracker.start_session(task).unwrap();
        clock.advance(Duration::seconds(3600));
        assert!(tracker.stop_session(task));

        let snapshot = tracker.snapshot();
        let session = snapshot.session(session).unwrap();
        assert_eq!(session.duration(tracker.now()), Duration::seconds(3600));
        assert!(!snapshot.task(task).unwrap().is_running);
    }

    #[test]
    fn deleting_project_removes_tasks_and_sessions() {
        let (mut tracker, clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let other = tracker.add_project("Reading").unwrap();
        let a = tracker.add_task(project, "Draft").unwrap();
        let b = tracker.add_task(project, "Edit").unwrap();
        let kept = tracker.add_task(other, "Books").unwrap();

        for task in [a, b, kept] {
            tracker.start_session(task);
            clock.advance(Duration::minutes(10));
            tracker.stop_session(task);
        }

        assert!(tracker.delete_project(project));
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.sessions.len(), 1);
        assert_eq!(snapshot.sessions[0].task_id, kept);
        assert!(!tracker.delete_project(project));
    }

    #[test]
    fn deleting_task_removes_its_sessions() {
        let (mut tracker, clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let task = tracker.add_task(project, "Draft").unwrap();
        tracker.start_session(task);
        clock.advance(Duration::minutes(1));

        assert!(tracker.delete_task(task));
        let snapshot = tracker.snapshot();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.sessions.is_empty());
        assert_eq!(snapshot.projects.len(), 1);
    }

    #[test]
    fn stop_all_is_idempotent() {
        let (mut tracker, _clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let task = tracker.add_task(project, "Draft").unwrap();
        tracker.start_session(task);

        assert_eq!(tracker.stop_all_sessions(), 1);
        let version = tracker.version();
        let before = tracker.snapshot();

        assert_eq!(tracker.stop_all_sessions(), 0);
        assert_eq!(tracker.version(), version);
        assert_eq!(*tracker.snapshot(), *before);
    }

    #[test]
    fn empty_names_are_refused() {
        let (mut tracker, _clock, mut rx) = tracker();
        assert!(matches!(
            tracker.add_project("   "),
            Err(TrackerError::Validation { .. })
        ));
        let project = tracker.add_project("Writing").unwrap();
        assert!(matches!(
            tracker.add_task(project, ""),
            Err(TrackerError::Validation { .. })
        ));
        assert!(tracker.rename_project(project, "\t").is_err());
        assert_eq!(tracker.version(), 1);
        assert_eq!(rx.try_recv().unwrap().version(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn zero_and_unknown_tasks_do_not_start() {
        let (mut tracker, _clock, _rx) = tracker();
        assert!(tracker.start_session(TaskId(0)).is_none());
        assert!(tracker.start_session(TaskId(42)).is_none());
        assert_eq!(tracker.version(), 0);
        assert!(tracker.snapshot().sessions.is_empty());
    }

    #[test]
    fn task_for_missing_project_is_accepted() {
        let (mut tracker, _clock, _rx) = tracker();
        let task = tracker.add_task(ProjectId(77), "Orphan").unwrap();
        assert_eq!(tracker.snapshot().task(task).unwrap().project_id, ProjectId(77));
    }

    #[test]
    fn duplicate_copies_tasks_but_not_sessions() {
        let (mut tracker, clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let task = tracker.add_task(project, "Draft").unwrap();
        tracker.add_task(project, "Edit").unwrap();
        tracker.start_session(task);
        clock.advance(Duration::minutes(5));
        tracker.complete_project(project);

        let copy = tracker.duplicate_project(project).unwrap();
        let snapshot = tracker.snapshot();
        let copied = snapshot.project(copy).unwrap();
        assert_eq!(copied.name, "Writing (Copy)");
        assert!(!copied.completed);

        let titles: Vec<&str> = snapshot
            .project_tasks(copy)
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["Draft", "Edit"]);
        assert!(snapshot.project_tasks(copy).all(|t| !t.is_running));
        assert!(snapshot.project_tasks(copy).all(|t| t.id != task));
        assert_eq!(snapshot.sessions.len(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let (mut tracker, _clock, _rx) = tracker();
        let a = tracker.add_project("A").unwrap();
        let b = tracker.add_project("B").unwrap();
        let task = tracker.add_task(a, "T").unwrap();
        assert_ne!(a, b);
        assert_ne!(b.0, task.0);
    }

    #[test]
    fn every_mutation_reaches_the_sink() {
        let (mut tracker, _clock, mut rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        tracker.rename_project(project, "Prose").unwrap();
        tracker.complete_project(project);
        tracker.reopen_project(project);

        let versions: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|s| s.version())
            .collect();
        assert_eq!(versions, [1, 2, 3, 4]);
    }

    #[test]
    fn snapshots_are_not_affected_by_later_mutations() {
        let (mut tracker, _clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let before = tracker.snapshot();
        tracker.delete_project(project);

        assert_eq!(before.projects.len(), 1);
        assert!(tracker.snapshot().projects.is_empty());
        assert!(before.version() < tracker.version());
    }

    #[tokio::test]
    async fn subscribers_see_new_versions() {
        let (mut tracker, _clock, _rx) = tracker();
        let mut versions = tracker.subscribe();
        tracker.add_project("Writing").unwrap();
        versions.changed().await.unwrap();
        assert_eq!(*versions.borrow_and_update(), 1);
    }

    #[test]
    fn deleting_open_session_stops_its_task() {
        let (mut tracker, _clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        let task = tracker.add_task(project, "Draft").unwrap();
        let session = tracker.start_session(task).unwrap();

        assert!(tracker.delete_session(session));
        assert!(!tracker.snapshot().task(task).unwrap().is_running);
        assert!(!tracker.delete_session(session));
    }

    #[test]
    fn import_replaces_present_collections_only() {
        let (mut tracker, _clock, _rx) = tracker();
        let project = tracker.add_project("Writing").unwrap();
        tracker.add_task(project, "Draft").unwrap();

        let bundle =
            DataBundle::from_json(r#"{ "projects": [{ "id": 3, "name": "Imported" }] }"#).unwrap();
        tracker.replace_all_data(bundle);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].name, "Imported");
        assert_eq!(snapshot.tasks.len(), 1);
    }

    #[test]
    fn imported_largest_id_still_yields_unique_ids() {
        let (mut tracker, _clock, _rx) = tracker();
        let bundle = DataBundle::from_json(
            r#"{ "projects": [{ "id": 9223372036854775807, "name": "Big" }] }"#,
        )
        .unwrap();
        tracker.replace_all_data(bundle);

        let next = tracker.add_project("Next").unwrap();
        let task = tracker.add_task(next, "Draft").unwrap();
        let copy = tracker.duplicate_project(next).unwrap();

        let now_ms = tracker.now().timestamp_millis();
        assert_eq!(next, ProjectId(now_ms));
        assert_eq!(task, TaskId(now_ms + 1));

        let snapshot = tracker.snapshot();
        let mut ids: Vec<i64> = snapshot.ids().collect();
        assert_eq!(ids.len(), 5);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert!(snapshot.project(copy).is_some());
        assert!(snapshot.project(ProjectId(i64::MAX)).is_some());
    }

    #[test]
    fn loading_repairs_several_open_sessions() {
        let start = Utc.with_ymd_and_hms(2024, 4, 5, 8, 0, 0).unwrap();
        let data = TrackerData {
            tasks: vec![
                Task {
                    id: TaskId(1),
                    project_id: ProjectId(1),
                    title: "a".into(),
                    is_running: true,
                },
                Task {
                    id: TaskId(2),
                    project_id: ProjectId(1),
                    title: "b".into(),
                    is_running: true,
                },
            ],
            sessions: vec![
                Session {
                    id: SessionId(1),
                    task_id: TaskId(1),
                    start_time: start,
                    end_time: None,
                },
                Session {
                    id: SessionId(2),
                    task_id: TaskId(2),
                    start_time: start + Duration::minutes(30),
                    end_time: None,
                },
            ],
            ..Default::default()
        };

        let (tracker, _clock, mut rx) = tracker_with(data);
        assert_single_runner(&tracker);
        assert_eq!(tracker.snapshot().running_task().unwrap().id, TaskId(2));
        assert_eq!(rx.try_recv().unwrap().version(), 1);
    }

    #[test]
    fn clear_keeps_settings() {
        let (mut tracker, _clock, _rx) = tracker();
        tracker.add_project("Writing").unwrap();
        tracker.update_settings(Settings {
            idle_timeout: 15,
            ..Default::default()
        });
        tracker.clear_all_data();

        let snapshot = tracker.snapshot();
        assert!(snapshot.projects.is_empty());
        assert_eq!(snapshot.settings.idle_timeout, 15);

        tracker.reset_settings();
        assert_eq!(tracker.snapshot().settings, Settings::default());
    }
}
