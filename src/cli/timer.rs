//! `start`, `stop` and the `status` dashboard.

use std::fmt::Write;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
    analysis::{
        focus::{daily_goal_progress, last_stopped_task, running_task, task_order},
        histogram::{daily_histogram, DAY_NAMES},
        totals::{overview, task_summary},
        window::{filter_by_window, Window},
        Lookup,
    },
    store::Store,
    tracker::{data::TrackerData, entities::TaskId},
    utils::time::{format_duration, format_hours},
};

use super::workspace::Workspace;

const DASHBOARD_TASKS: usize = 5;

pub async fn process_start<S: Store + Clone>(workspace: &Workspace<S>, task: TaskId) -> Result<()> {
    workspace
        .mutate(|t| t.start_session(task).ok_or_else(|| anyhow!("Task {task} doesn't exist")))
        .await?;
    println!("Started task {task}");
    Ok(())
}

/// Stops one task, or every running one without an argument.
pub async fn process_stop<S: Store + Clone>(
    workspace: &Workspace<S>,
    task: Option<TaskId>,
) -> Result<()> {
    match task {
        Some(task) => {
            if workspace.mutate(|t| Ok(t.stop_session(task))).await? {
                println!("Stopped task {task}");
            } else {
                println!("Task {task} isn't running");
            }
        }
        None => {
            let stopped = workspace.mutate(|t| Ok(t.stop_all_sessions())).await?;
            println!("Stopped {stopped} sessions");
        }
    }
    Ok(())
}

pub async fn process_status<S: Store + Clone>(workspace: &Workspace<S>) -> Result<()> {
    let data = workspace.load().await;
    let now = workspace.now();
    print!("{}", render_status(&data, &now.with_timezone(&Local), now)?);
    Ok(())
}

/// The dashboard: what is running, the goal, overview numbers, the week and the top tasks.
pub fn render_status<Tz: TimeZone>(
    data: &TrackerData,
    reference: &DateTime<Tz>,
    now: DateTime<Utc>,
) -> Result<String>
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();

    match running_task(data, now) {
        Some(running) => {
            writeln!(
                out,
                "Working on {} ({}) for {}",
                running.task.title,
                running.project,
                format_duration(running.elapsed)
            )?;
        }
        None => {
            writeln!(out, "Idle")?;
            if let Some(last) = last_stopped_task(data) {
                let title = last.task.map(|t| t.title.as_str()).unwrap_or("Unknown task");
                let ended = last
                    .session
                    .end_time
                    .map(|v| v.with_timezone(&reference.timezone()).format("%x %H:%M").to_string())
                    .unwrap_or_default();
                writeln!(out, "Last worked on {title}, stopped {ended}")?;
            }
        }
    }

    let goal = daily_goal_progress(data, reference, now);
    writeln!(
        out,
        "Today {} of {} ({}){}",
        format_duration(goal.worked),
        format_duration(goal.goal),
        goal.progress,
        if goal.achieved() { " goal reached" } else { "" }
    )?;

    let overview = overview(data, reference, now);
    writeln!(
        out,
        "Week {} ({})\tMonth {} ({})\tRunning {}",
        format_hours(overview.week),
        overview.week_share(),
        format_hours(overview.month),
        overview.month_share(),
        overview.active_tasks
    )?;

    writeln!(out, "\nThis week")?;
    let week = daily_histogram(&data.sessions, reference, now);
    for (name, duration) in DAY_NAMES.iter().zip(week) {
        writeln!(out, "{name}\t{}", format_hours(duration))?;
    }

    let summary = task_summary(
        filter_by_window(&data.sessions, Window::Week, reference),
        &data.tasks,
        &data.projects,
        now,
    );
    if !summary.is_empty() {
        writeln!(out, "\nTop tasks")?;
        for entry in summary.iter().take(DASHBOARD_TASKS) {
            writeln!(
                out,
                "{}\t{}\t{}",
                format_duration(entry.duration),
                entry.project,
                entry.title
            )?;
        }
    }

    let tasks = task_order(data);
    if !tasks.is_empty() {
        let lookup = Lookup::new(&data.tasks, &data.projects);
        writeln!(out, "\nTasks")?;
        for task in tasks.into_iter().take(DASHBOARD_TASKS) {
            let marker = if task.is_running { "*" } else { " " };
            writeln!(
                out,
                "{marker}{}\t{}\t{}",
                task.id,
                lookup.project_name(task.id),
                task.title
            )?;
        }
    }
    Ok(out)
}
