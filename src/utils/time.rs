use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Sunday that opens the calendar week `date` belongs to.
pub fn sunday_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Converts milliseconds since the unix epoch. Out of range values produce `None`.
pub fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Format used whenever a duration is shown to a person.
pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}

/// Hours with two decimals, the unit every report column uses.
pub fn format_hours(v: Duration) -> String {
    format!("{:.2}", v.num_seconds() as f64 / 3600.)
}
