//! Coarse activity picture built from screenshots alone: every screenshot stands for the time
//! until the next one.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::analysis::{histogram::hourly_histogram, rank_by, OrderedTotals};

use super::artifact::ArtifactName;

pub const IDLE_BUCKET: &str = "Idle";

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    /// Project segment of the label, [IDLE_BUCKET] when there is none.
    pub bucket: String,
    pub duration: Duration,
}

impl TimelineEntry {
    pub fn is_idle(&self) -> bool {
        self.bucket == IDLE_BUCKET
    }
}

/// Orders artifacts by time and gives each one the span up to its successor, the last one
/// lasting until `now`. Artifacts without a timestamp are left out.
pub fn build_timeline(artifacts: &[ArtifactName], now: DateTime<Utc>) -> Vec<TimelineEntry> {
    let mut stamped: Vec<(DateTime<Utc>, &ArtifactName)> = artifacts
        .iter()
        .filter_map(|a| a.timestamp.map(|t| (t, a)))
        .collect();
    stamped.sort_by_key(|v| v.0);

    let ends = stamped
        .iter()
        .skip(1)
        .map(|v| v.0)
        .chain(std::iter::once(now));

    stamped
        .iter()
        .zip(ends)
        .map(|((timestamp, artifact), end)| {
            let segment = artifact.project_segment();
            TimelineEntry {
                timestamp: *timestamp,
                bucket: if segment.is_empty() {
                    IDLE_BUCKET.to_string()
                } else {
                    segment.to_string()
                },
                duration: (end - *timestamp).max(Duration::zero()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivitySplit {
    pub active: Duration,
    pub idle: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineAnalytics {
    /// Buckets in the order they first appear.
    pub time_by_project: Vec<(String, Duration)>,
    /// Indexed Sun..Sat.
    pub active_vs_idle: [ActivitySplit; 7],
    pub daily_trend: BTreeMap<NaiveDate, Duration>,
    pub hourly: [Duration; 24],
}

impl TimelineAnalytics {
    pub fn total(&self) -> Duration {
        self.time_by_project
            .iter()
            .fold(Duration::zero(), |acc, (_, d)| acc + *d)
    }

    /// Projects with time, longest first, without the idle bucket.
    pub fn top_projects(&self) -> Vec<(String, Duration)> {
        let mut projects: Vec<(String, Duration)> = self
            .time_by_project
            .iter()
            .filter(|(name, d)| name != IDLE_BUCKET && *d > Duration::zero())
            .cloned()
            .collect();
        rank_by(&mut projects, |v| v.1);
        projects
    }
}

/// Aggregates the timeline by project, weekday, calendar date and hour. Dates and hours are
/// taken in `tz`.
pub fn analyze_timeline<Tz: TimeZone>(entries: &[TimelineEntry], tz: &Tz) -> TimelineAnalytics {
    let mut by_project = OrderedTotals::default();
    let mut active_vs_idle = [ActivitySplit::default(); 7];
    let mut daily_trend = BTreeMap::<NaiveDate, Duration>::new();

    for entry in entries {
        by_project.add(entry.bucket.clone(), entry.duration);

        let local = entry.timestamp.with_timezone(tz);
        let split = &mut active_vs_idle[local.weekday().num_days_from_sunday() as usize];
        if entry.is_idle() {
            split.idle += entry.duration;
        } else {
            split.active += entry.duration;
        }

        *daily_trend
            .entry(local.date_naive())
            .or_insert_with(Duration::zero) += entry.duration;
    }

    TimelineAnalytics {
        time_by_project: by_project.into_vec(),
        active_vs_idle,
        daily_trend,
        hourly: hourly_histogram(entries, tz),
    }
}
