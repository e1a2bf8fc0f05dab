//! Read only views: `report`, `history`, `analytics` and `screenshots`.

use std::fmt::{Display, Write};

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    analysis::{
        history::{group_by_date, group_by_project},
        histogram::DAY_NAMES,
        totals::{project_report, task_summary},
        window::{filter_by_window, Window},
        Lookup,
    },
    screenshots::{
        artifact::ArtifactName,
        resolver::{label_for, resolve, session_artifacts},
        source::ArtifactSource,
        timeline::{analyze_timeline, build_timeline},
    },
    store::Store,
    tracker::{
        data::TrackerData,
        entities::{Session, SessionId},
    },
    utils::time::{format_duration, format_hours},
};

use super::{workspace::Workspace, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(long, short, default_value_t = Window::Week, help = "Window around the reference date")]
    window: Window,
    #[arg(
        long,
        short,
        help = "Reference date, today by default. Examples are \"yesterday\", \"last friday\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryGrouping {
    Date,
    Project,
}

impl Display for HistoryGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryGrouping::Date => write!(f, "date"),
            HistoryGrouping::Project => write!(f, "project"),
        }
    }
}

fn parse_reference(
    date: Option<&str>,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<DateTime<Local>> {
    match date.map(|s| parse_date_string(s, now, date_style.into())) {
        Some(Ok(v)) => Ok(v.with_timezone(&Local)),
        Some(Err(e)) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
        None => Ok(now),
    }
}

pub async fn process_report_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    ReportCommand {
        window,
        date,
        date_style,
    }: ReportCommand,
) -> Result<()> {
    let now = workspace.now();
    let reference = parse_reference(date.as_deref(), date_style, now.with_timezone(&Local))?;
    let data = workspace.load().await;
    print!("{}", render_report(&data, window, &reference, now)?);
    Ok(())
}

pub fn render_report<Tz: TimeZone>(
    data: &TrackerData,
    window: Window,
    reference: &DateTime<Tz>,
    now: DateTime<Utc>,
) -> Result<String>
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    let (start, end) = window.bounds(reference);
    writeln!(
        out,
        "{} {} - {}",
        window,
        start.format("%x"),
        end.format("%x")
    )?;

    let sessions = filter_by_window(&data.sessions, window, reference);
    let report = project_report(
        sessions.iter().copied(),
        &data.tasks,
        &data.projects,
        now,
    );
    writeln!(out, "Total {}h", format_hours(report.total))?;
    if let Some(top) = report.top() {
        writeln!(out, "Top project {}", top.name)?;
    }

    writeln!(out, "\nProjects")?;
    for row in &report.rows {
        let status = match row.completed {
            Some(true) => "completed",
            Some(false) => "active",
            None => "-",
        };
        writeln!(
            out,
            "{}h\t{}\t{}\t{}",
            format_hours(row.duration),
            report.share(row),
            status,
            row.name
        )?;
    }

    let summary = task_summary(sessions, &data.tasks, &data.projects, now);
    if !summary.is_empty() {
        writeln!(out, "\nTasks")?;
        for entry in summary {
            writeln!(
                out,
                "{}h\t{}\t{}",
                format_hours(entry.duration),
                entry.project,
                entry.title
            )?;
        }
    }
    Ok(out)
}

pub async fn process_history_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    by: HistoryGrouping,
) -> Result<()> {
    let data = workspace.load().await;
    print!("{}", render_history(&data, by, &Local, workspace.now())?);
    Ok(())
}

fn write_session<Tz: TimeZone>(
    out: &mut String,
    session: &Session,
    lookup: &Lookup,
    tz: &Tz,
    now: DateTime<Utc>,
) -> std::fmt::Result
where
    Tz::Offset: Display,
{
    let end = session
        .end_time
        .map(|v| v.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "running".into());
    let title = lookup
        .task(session.task_id)
        .map(|t| t.title.as_str())
        .unwrap_or("Unknown task");
    writeln!(
        out,
        "  {}\t{} - {}\t{}\t{}\t{}",
        session.id,
        session.start_time.with_timezone(tz).format("%H:%M"),
        end,
        format_duration(session.duration(now)),
        lookup.project_name(session.task_id),
        title
    )
}

/// Every session, grouped by local start date (newest first) or by project name.
pub fn render_history<Tz: TimeZone>(
    data: &TrackerData,
    by: HistoryGrouping,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<String>
where
    Tz::Offset: Display,
{
    let lookup = Lookup::new(&data.tasks, &data.projects);
    let mut out = String::new();
    match by {
        HistoryGrouping::Date => {
            for group in group_by_date(&data.sessions, tz, now) {
                writeln!(out, "{}\t{}", group.key, format_duration(group.total))?;
                for session in group.sessions {
                    write_session(&mut out, session, &lookup, tz, now)?;
                }
            }
        }
        HistoryGrouping::Project => {
            for group in group_by_project(&data.sessions, &lookup, now) {
                writeln!(out, "{}\t{}", group.key, format_duration(group.total))?;
                for session in group.sessions {
                    write_session(&mut out, session, &lookup, tz, now)?;
                }
            }
        }
    }
    Ok(out)
}

pub async fn process_analytics_command<S: Store + Clone>(workspace: &Workspace<S>) -> Result<()> {
    let artifacts = workspace.screenshots().list().await;
    print!("{}", render_analytics(&artifacts, &Local, workspace.now())?);
    Ok(())
}

/// Activity estimated from screenshots alone.
pub fn render_analytics<Tz: TimeZone>(
    artifacts: &[ArtifactName],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<String> {
    let timeline = build_timeline(artifacts, now);
    let mut out = String::new();
    if timeline.is_empty() {
        writeln!(out, "No screenshots yet")?;
        return Ok(out);
    }
    let analytics = analyze_timeline(&timeline, tz);

    writeln!(out, "Total {}h", format_hours(analytics.total()))?;
    writeln!(out, "\nProjects")?;
    for (name, duration) in analytics.top_projects() {
        writeln!(out, "{}h\t{name}", format_hours(duration))?;
    }

    writeln!(out, "\nActive / idle")?;
    for (name, split) in DAY_NAMES.iter().zip(analytics.active_vs_idle) {
        writeln!(
            out,
            "{name}\t{}h\t{}h",
            format_hours(split.active),
            format_hours(split.idle)
        )?;
    }

    writeln!(out, "\nDays")?;
    for (date, duration) in &analytics.daily_trend {
        writeln!(out, "{date}\t{}h", format_hours(*duration))?;
    }

    writeln!(out, "\nHours")?;
    for (hour, duration) in analytics.hourly.iter().enumerate() {
        if *duration > chrono::Duration::zero() {
            writeln!(out, "{hour:02}:00\t{}h", format_hours(*duration))?;
        }
    }
    Ok(out)
}

#[derive(Debug, Parser)]
pub struct ScreenshotsCommand {
    #[arg(long, help = "Only screenshots taken during this session")]
    session: Option<SessionId>,
    #[arg(long, help = "Delete a screenshot by its file name")]
    delete: Option<String>,
}

pub async fn process_screenshots_command<S: Store + Clone>(
    workspace: &Workspace<S>,
    ScreenshotsCommand { session, delete }: ScreenshotsCommand,
) -> Result<()> {
    if let Some(identifier) = delete {
        workspace.screenshots().delete(&identifier).await?;
        println!("Deleted {identifier}");
        return Ok(());
    }

    let data = workspace.load().await;
    let artifacts = workspace.screenshots().list().await;
    print!(
        "{}",
        render_screenshots(&data, &artifacts, session, workspace.now())?
    );
    Ok(())
}

/// Screenshots with the session each belongs to, or only the ones of `session`.
pub fn render_screenshots(
    data: &TrackerData,
    artifacts: &[ArtifactName],
    session: Option<SessionId>,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut out = String::new();
    let lookup = Lookup::new(&data.tasks, &data.projects);

    if let Some(id) = session {
        let session = data
            .session(id)
            .ok_or_else(|| anyhow::anyhow!("Session {id} doesn't exist"))?;
        writeln!(out, "{}", label_for(session, &lookup))?;
        for artifact in session_artifacts(session, &lookup, artifacts, now) {
            writeln!(out, "{artifact}")?;
        }
        return Ok(out);
    }

    let resolution = resolve(data, artifacts, now);
    for session in &data.sessions {
        let Some(found) = resolution.by_session.get(&session.id) else {
            continue;
        };
        for artifact in found {
            writeln!(out, "{}\t{artifact}", session.id)?;
        }
    }
    for artifact in resolution.unmatched {
        writeln!(out, "-\t{artifact}")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, Local, TimeZone, Utc};

    use crate::{
        analysis::window::Window,
        cli::workspace::test_workspace::test_workspace,
        screenshots::artifact::ArtifactName,
        tracker::entities::SessionId,
    };

    use super::{
        parse_reference, render_analytics, render_history, render_report, render_screenshots,
        DateStyle, HistoryGrouping,
    };

    #[test]
    fn reference_dates_are_parsed() -> Result<()> {
        let now = Local.with_ymd_and_hms(2024, 4, 5, 12, 0, 0).unwrap();
        assert_eq!(parse_reference(None, DateStyle::Uk, now)?, now);
        let yesterday = parse_reference(Some("yesterday"), DateStyle::Uk, now)?;
        assert_eq!(yesterday.date_naive(), (now - Duration::days(1)).date_naive());
        assert!(parse_reference(Some("not a date at all"), DateStyle::Uk, now).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn report_ranks_projects() -> Result<()> {
        let test = test_workspace();
        let draft = test
            .workspace
            .mutate(|t| {
                let writing = t.add_project("Writing")?;
                let draft = t.add_task(writing, "Draft")?;
                let admin = t.add_project("Admin")?;
                let mail = t.add_task(admin, "Mail")?;
                t.start_session(mail);
                Ok(draft)
            })
            .await?;
        test.clock.advance(Duration::minutes(30));
        test.workspace.mutate(|t| Ok(t.start_session(draft))).await?;
        test.clock.advance(Duration::minutes(90));
        test.workspace.mutate(|t| Ok(t.stop_all_sessions())).await?;

        let data = test.workspace.load().await;
        let now = test.workspace.now();
        let report = render_report(&data, Window::Day, &now, now)?;
        assert!(report.contains("Total 2.00h\nTop project Writing\n"));
        let projects = report
            .split("\nProjects\n")
            .nth(1)
            .unwrap_or_default()
            .lines()
            .take(2)
            .collect::<Vec<_>>();
        assert_eq!(
            projects,
            ["1.50h\t75.0%\tactive\tWriting", "0.50h\t25.0%\tactive\tAdmin"]
        );

        let history = render_history(&data, HistoryGrouping::Project, &Utc, now)?;
        let headers: Vec<&str> = history.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(headers, ["Admin\t30m0s", "Writing\t1h30m0s"]);
        Ok(())
    }

    #[test]
    fn analytics_without_screenshots() -> Result<()> {
        assert_eq!(render_analytics(&[], &Utc, Utc::now())?, "No screenshots yet\n");
        Ok(())
    }

    #[test]
    fn analytics_from_screenshots() -> Result<()> {
        let base = Utc.with_ymd_and_hms(2024, 4, 7, 10, 0, 0).unwrap();
        let artifacts = [
            ArtifactName::parse(&format!("{}-ProjA-TaskX.png", base.timestamp_millis())),
            ArtifactName::parse(&format!(
                "{}-.png",
                (base + Duration::minutes(30)).timestamp_millis()
            )),
        ];
        let text = render_analytics(&artifacts, &Utc, base + Duration::hours(1))?;
        assert!(text.starts_with("Total 1.00h\n\nProjects\n0.50h\tProjA\n"));
        assert!(text.contains("Sun\t0.50h\t0.50h\n"));
        assert!(text.contains("2024-04-07\t1.00h\n"));
        assert!(text.contains("10:00\t1.00h\n"));
        Ok(())
    }

    #[tokio::test]
    async fn screenshots_are_listed_by_session() -> Result<()> {
        let test = test_workspace();
        let start = test.workspace.now();
        test.workspace
            .mutate(|t| {
                let project = t.add_project("ProjA")?;
                let task = t.add_task(project, "TaskX")?;
                t.start_session(task);
                Ok(())
            })
            .await?;
        test.clock.advance(Duration::minutes(10));
        test.workspace.mutate(|t| Ok(t.stop_all_sessions())).await?;

        let data = test.workspace.load().await;
        let inside = (start + Duration::minutes(5)).timestamp_millis();
        let after = (start + Duration::minutes(15)).timestamp_millis();
        let artifacts = [
            ArtifactName::parse(&format!("{inside}-ProjA-TaskX.png")),
            ArtifactName::parse(&format!("{after}-ProjA-TaskX.png")),
        ];
        let session = data.sessions[0].id;

        let all = render_screenshots(&data, &artifacts, None, test.workspace.now())?;
        assert_eq!(
            all,
            format!("{session}\t{inside}-ProjA-TaskX.png\n-\t{after}-ProjA-TaskX.png\n")
        );

        let one = render_screenshots(&data, &artifacts, Some(session), test.workspace.now())?;
        assert_eq!(one, format!("ProjA-TaskX\n{inside}-ProjA-TaskX.png\n"));

        assert!(render_screenshots(&data, &artifacts, Some(SessionId(1)), start).is_err());
        Ok(())
    }
}
