use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    analysis::Lookup,
    tracker::{
        data::TrackerData,
        entities::{ProjectId, Session, SessionId},
    },
};

use super::artifact::{canonical_label, session_label, ArtifactName};

/// Label the capture side used while `session` was running.
pub fn label_for(session: &Session, lookup: &Lookup) -> String {
    let task = lookup.task(session.task_id);
    let project = lookup.project_of_task(session.task_id);
    session_label(
        project.map(|p| p.name.as_str()),
        task.map(|t| t.title.as_str()),
    )
}

fn belongs(
    artifact: &ArtifactName,
    canonical: &str,
    session: &Session,
    now: DateTime<Utc>,
) -> bool {
    let Some(timestamp) = artifact.timestamp else {
        return false;
    };
    canonical_label(&artifact.label) == canonical && session.covers(timestamp, now)
}

/// Artifacts taken during `session` under its label.
pub fn session_artifacts<'a>(
    session: &Session,
    lookup: &Lookup,
    artifacts: &'a [ArtifactName],
    now: DateTime<Utc>,
) -> Vec<&'a ArtifactName> {
    let canonical = canonical_label(&label_for(session, lookup));
    artifacts
        .iter()
        .filter(|a| belongs(a, &canonical, session, now))
        .collect()
}

#[derive(Debug, Default)]
pub struct Resolution<'a> {
    pub by_session: HashMap<SessionId, Vec<&'a ArtifactName>>,
    /// Artifacts no session claims, including the ones without a timestamp.
    pub unmatched: Vec<&'a ArtifactName>,
}

/// Assigns every artifact to the first session (in stored order) that claims it.
pub fn resolve<'a>(
    data: &TrackerData,
    artifacts: &'a [ArtifactName],
    now: DateTime<Utc>,
) -> Resolution<'a> {
    let lookup = Lookup::new(&data.tasks, &data.projects);
    let labels: Vec<(&Session, String)> = data
        .sessions
        .iter()
        .map(|s| (s, canonical_label(&label_for(s, &lookup))))
        .collect();

    let mut resolution = Resolution::default();
    for artifact in artifacts {
        match labels
            .iter()
            .find(|(session, canonical)| belongs(artifact, canonical, session, now))
        {
            Some((session, _)) => resolution
                .by_session
                .entry(session.id)
                .or_default()
                .push(artifact),
            None => resolution.unmatched.push(artifact),
        }
    }
    resolution
}

/// Every artifact labelled with one of the project's tasks, whenever it was taken.
pub fn project_artifacts<'a>(
    project_id: ProjectId,
    data: &TrackerData,
    artifacts: &'a [ArtifactName],
) -> Vec<&'a ArtifactName> {
    let Some(project) = data.project(project_id) else {
        return vec![];
    };
    let labels: Vec<String> = data
        .project_tasks(project_id)
        .map(|t| {
            let label = session_label(Some(project.name.as_str()), Some(t.title.as_str()));
            canonical_label(&label)
        })
        .collect();

    artifacts
        .iter()
        .filter(|a| labels.contains(&canonical_label(&a.label)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::{
        analysis::Lookup,
        screenshots::artifact::ArtifactName,
        tracker::{
            data::TrackerData,
            entities::{Project, ProjectId, Session, SessionId, Task, TaskId},
        },
    };

    use super::{project_artifacts, resolve, session_artifacts};

    fn ms(v: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(v).unwrap()
    }

    fn data() -> TrackerData {
        TrackerData {
            projects: vec![
                Project {
                    id: ProjectId(1),
                    name: "ProjA".into(),
                    completed: false,
                },
                Project {
                    id: ProjectId(2),
                    name: "ProjB".into(),
                    completed: false,
                },
            ],
            tasks: vec![
                Task {
                    id: TaskId(10),
                    project_id: ProjectId(1),
                    title: "TaskX".into(),
                    is_running: false,
                },
                Task {
                    id: TaskId(20),
                    project_id: ProjectId(2),
                    title: "TaskY".into(),
                    is_running: false,
                },
            ],
            sessions: vec![
                Session {
                    id: SessionId(100),
                    task_id: TaskId(10),
                    start_time: ms(500),
                    end_time: Some(ms(6000)),
                },
                Session {
                    id: SessionId(200),
                    task_id: TaskId(20),
                    start_time: ms(6000),
                    end_time: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn artifacts_inside_the_session_window_match() {
        let data = data();
        let artifacts: Vec<ArtifactName> = ["1000-ProjA_TaskX.png", "5000-ProjA_TaskX.png"]
            .into_iter()
            .map(ArtifactName::parse)
            .collect();
        let lookup = Lookup::new(&data.tasks, &data.projects);

        let found = session_artifacts(&data.sessions[0], &lookup, &artifacts, ms(10_000));
        assert_eq!(found.len(), 2);
        let other = session_artifacts(&data.sessions[1], &lookup, &artifacts, ms(10_000));
        assert!(other.is_empty());
    }

    #[test]
    fn label_or_time_mismatch_is_unmatched() {
        let data = data();
        let artifacts: Vec<ArtifactName> = [
            "1000-ProjA_TaskX.png",
            "7000-ProjA_TaskX.png",
            "7000-ProjB_TaskY.png",
            "9000-ProjB_TaskY.png",
            "oops-ProjB_TaskY.png",
            "2000-.png",
        ]
        .into_iter()
        .map(ArtifactName::parse)
        .collect();

        let resolution = resolve(&data, &artifacts, ms(8000));
        assert_eq!(resolution.by_session[&SessionId(100)].len(), 1);
        assert_eq!(resolution.by_session[&SessionId(200)].len(), 1);
        let unmatched: Vec<&str> = resolution
            .unmatched
            .iter()
            .map(|a| a.file_name.as_str())
            .collect();
        assert_eq!(
            unmatched,
            [
                "7000-ProjA_TaskX.png",
                "9000-ProjB_TaskY.png",
                "oops-ProjB_TaskY.png",
                "2000-.png"
            ]
        );
    }

    #[test]
    fn project_artifacts_ignore_time() {
        let data = data();
        let artifacts: Vec<ArtifactName> = [
            "1-ProjA_TaskX.png",
            "99999-ProjA-TaskX.png",
            "5-ProjB_TaskY.png",
        ]
        .into_iter()
        .map(ArtifactName::parse)
        .collect();

        let found = project_artifacts(ProjectId(1), &data, &artifacts);
        assert_eq!(found.len(), 2);
        assert!(project_artifacts(ProjectId(3), &data, &artifacts).is_empty());
    }
}
