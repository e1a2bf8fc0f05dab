use std::fmt::Display;

use chrono::{DateTime, Duration, TimeZone};
use clap::ValueEnum;
use now::DateTimeNow;

use crate::tracker::entities::Session;

/// Calendar windows used by the dashboard and reports. A session belongs to a window by the
/// local time it started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Window {
    /// The calendar date of the reference.
    Day,
    /// Seven calendar days ending with the reference date.
    Week,
    /// The calendar month of the reference.
    Month,
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Day => write!(f, "day"),
            Window::Week => write!(f, "week"),
            Window::Month => write!(f, "month"),
        }
    }
}

impl Window {
    /// Inclusive bounds of the window around `reference`, in its time zone.
    pub fn bounds<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
        match self {
            Window::Day => (reference.beginning_of_day(), reference.end_of_day()),
            Window::Week => (
                (reference.clone() - Duration::days(6)).beginning_of_day(),
                reference.end_of_day(),
            ),
            Window::Month => (reference.beginning_of_month(), reference.end_of_month()),
        }
    }

    pub fn contains<Tz: TimeZone>(&self, session: &Session, reference: &DateTime<Tz>) -> bool {
        let (start, end) = self.bounds(reference);
        let started = session.start_time.with_timezone(&reference.timezone());
        start <= started && started <= end
    }
}

pub fn filter_by_window<'a, Tz: TimeZone>(
    sessions: impl IntoIterator<Item = &'a Session>,
    window: Window,
    reference: &DateTime<Tz>,
) -> Vec<&'a Session> {
    let (start, end) = window.bounds(reference);
    sessions
        .into_iter()
        .filter(|s| {
            let started = s.start_time.with_timezone(&reference.timezone());
            start <= started && started <= end
        })
        .collect()
}
