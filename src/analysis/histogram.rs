use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

use crate::{
    screenshots::timeline::TimelineEntry, tracker::entities::Session,
    utils::time::sunday_week_start,
};

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Time per weekday of the Sunday-started week holding `reference`. A session counts fully on
/// the day it started, even when it runs past midnight.
pub fn daily_histogram<'a, Tz: TimeZone>(
    sessions: impl IntoIterator<Item = &'a Session>,
    reference: &DateTime<Tz>,
    now: DateTime<Utc>,
) -> [Duration; 7] {
    let tz = reference.timezone();
    let week_start = sunday_week_start(reference.date_naive());
    let week_end = week_start + Duration::days(6);

    let mut buckets = [Duration::zero(); 7];
    for session in sessions {
        let started = session.start_time.with_timezone(&tz).date_naive();
        if started < week_start || started > week_end {
            continue;
        }
        buckets[started.weekday().num_days_from_sunday() as usize] += session.duration(now);
    }
    buckets
}

/// Time per local hour of day, from the screenshot timeline.
pub fn hourly_histogram<Tz: TimeZone>(entries: &[TimelineEntry], tz: &Tz) -> [Duration; 24] {
    let mut buckets = [Duration::zero(); 24];
    for entry in entries {
        let hour = entry.timestamp.with_timezone(tz).hour() as usize;
        buckets[hour] += entry.duration;
    }
    buckets
}
