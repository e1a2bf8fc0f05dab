//! `project` and `task` commands.

use std::fmt::Write;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, Utc};
use clap::Subcommand;

use crate::{
    analysis::{
        history::project_sessions,
        totals::{per_task_totals, task_breakdown, total_duration},
        Lookup,
    },
    screenshots::{artifact::ArtifactName, resolver::project_artifacts, source::ArtifactSource},
    store::Store,
    tracker::{
        data::TrackerData,
        entities::{ProjectId, TaskId},
    },
    utils::time::format_duration,
};

use super::workspace::Workspace;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Create a project")]
    Add { name: String },
    #[command(about = "List projects with their tracked time")]
    List,
    #[command(about = "Tasks, sessions and screenshots of one project")]
    Show { id: ProjectId },
    Rename { id: ProjectId, name: String },
    #[command(about = "Mark a project as completed")]
    Complete { id: ProjectId },
    Reopen { id: ProjectId },
    #[command(about = "Copy a project with its tasks, without sessions")]
    Duplicate { id: ProjectId },
    #[command(about = "Delete a project with its tasks and sessions")]
    Delete { id: ProjectId },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(about = "Create a task inside a project")]
    Add { project: ProjectId, title: String },
    #[command(about = "List tasks with their tracked time")]
    List {
        #[arg(long, help = "Only tasks of this project")]
        project: Option<ProjectId>,
    },
    Rename { id: TaskId, title: String },
    #[command(about = "Delete a task with its sessions")]
    Delete { id: TaskId },
}

fn missing_project(id: ProjectId) -> anyhow::Error {
    anyhow!("Project {id} doesn't exist")
}

fn missing_task(id: TaskId) -> anyhow::Error {
    anyhow!("Task {id} doesn't exist")
}

pub async fn process_project_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    command: ProjectCommand,
) -> Result<()> {
    match command {
        ProjectCommand::Add { name } => {
            let id = workspace.mutate(|t| Ok(t.add_project(&name)?)).await?;
            println!("Created project {id}");
        }
        ProjectCommand::List => {
            print!("{}", render_projects(&workspace.load().await, workspace.now())?);
        }
        ProjectCommand::Show { id } => {
            let data = workspace.load().await;
            let artifacts = workspace.screenshots().list().await;
            print!(
                "{}",
                render_project_details(&data, id, &artifacts, workspace.now())?
            );
        }
        ProjectCommand::Rename { id, name } => {
            if !workspace.mutate(|t| Ok(t.rename_project(id, &name)?)).await? {
                return Err(missing_project(id));
            }
        }
        ProjectCommand::Complete { id } => {
            if !workspace.mutate(|t| Ok(t.complete_project(id))).await? {
                return Err(missing_project(id));
            }
        }
        ProjectCommand::Reopen { id } => {
            if !workspace.mutate(|t| Ok(t.reopen_project(id))).await? {
                return Err(missing_project(id));
            }
        }
        ProjectCommand::Duplicate { id } => {
            let copy = workspace
                .mutate(|t| Ok(t.duplicate_project(id)))
                .await?
                .ok_or_else(|| missing_project(id))?;
            println!("Created project {copy}");
        }
        ProjectCommand::Delete { id } => {
            if !workspace.mutate(|t| Ok(t.delete_project(id))).await? {
                return Err(missing_project(id));
            }
        }
    }
    Ok(())
}

pub async fn process_task_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    command: TaskCommand,
) -> Result<()> {
    match command {
        TaskCommand::Add { project, title } => {
            let id = workspace.mutate(|t| Ok(t.add_task(project, &title)?)).await?;
            println!("Created task {id}");
        }
        TaskCommand::List { project } => {
            print!(
                "{}",
                render_tasks(&workspace.load().await, project, workspace.now())?
            );
        }
        TaskCommand::Rename { id, title } => {
            if !workspace.mutate(|t| Ok(t.rename_task(id, &title)?)).await? {
                return Err(missing_task(id));
            }
        }
        TaskCommand::Delete { id } => {
            if !workspace.mutate(|t| Ok(t.delete_task(id))).await? {
                return Err(missing_task(id));
            }
        }
    }
    Ok(())
}

pub fn render_projects(data: &TrackerData, now: DateTime<Utc>) -> Result<String> {
    let totals = per_task_totals(&data.sessions, &data.tasks, now);
    let mut out = String::new();
    for project in &data.projects {
        let total = data
            .project_tasks(project.id)
            .filter_map(|t| totals.get(&t.id))
            .fold(Duration::zero(), |acc, d| acc + *d);
        let status = if project.completed { "completed" } else { "active" };
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            project.id,
            status,
            format_duration(total),
            project.name
        )?;
    }
    Ok(out)
}

pub fn render_tasks(
    data: &TrackerData,
    project: Option<ProjectId>,
    now: DateTime<Utc>,
) -> Result<String> {
    let lookup = Lookup::new(&data.tasks, &data.projects);
    let totals = per_task_totals(&data.sessions, &data.tasks, now);
    let mut out = String::new();
    for task in data
        .tasks
        .iter()
        .filter(|t| project.map_or(true, |p| t.project_id == p))
    {
        let marker = if task.is_running { "*" } else { " " };
        let total = totals.get(&task.id).copied().unwrap_or_else(Duration::zero);
        writeln!(
            out,
            "{}{}\t{}\t{}\t{}",
            marker,
            task.id,
            format_duration(total),
            lookup.project_name(task.id),
            task.title
        )?;
    }
    Ok(out)
}

pub fn render_project_details(
    data: &TrackerData,
    id: ProjectId,
    artifacts: &[ArtifactName],
    now: DateTime<Utc>,
) -> Result<String> {
    let project = data.project(id).ok_or_else(|| missing_project(id))?;
    let mut out = String::new();

    let sessions = project_sessions(id, &data.sessions, &data.tasks);
    let total = total_duration(sessions.iter().copied(), now, |_| true);
    let status = if project.completed { "completed" } else { "active" };
    writeln!(out, "{} ({status}) {}", project.name, format_duration(total))?;

    writeln!(out, "\nTasks")?;
    for task in task_breakdown(id, &data.sessions, &data.tasks, now) {
        writeln!(
            out,
            "{}\t{}\t{}",
            task.task_id,
            format_duration(task.duration),
            task.title
        )?;
    }

    let lookup = Lookup::new(&data.tasks, &data.projects);
    writeln!(out, "\nSessions")?;
    for session in sessions {
        let title = lookup
            .task(session.task_id)
            .map(|t| t.title.as_str())
            .unwrap_or_default();
        let end = session
            .end_time
            .map(|v| v.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "running".into());
        writeln!(
            out,
            "{}\t{} - {}\t{}\t{}",
            session.id,
            session.start_time.with_timezone(&Local).format("%x %H:%M"),
            end,
            format_duration(session.duration(now)),
            title
        )?;
    }

    let screenshots = project_artifacts(id, data, artifacts);
    if !screenshots.is_empty() {
        writeln!(out, "\nScreenshots")?;
        for artifact in screenshots {
            writeln!(out, "{artifact}")?;
        }
    }
    Ok(out)
}
