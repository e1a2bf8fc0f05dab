use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::warn;

/// Hands out ids that look like the millisecond timestamps older data used, but never repeat.
/// Normally each id is larger than every id seen or produced before. Once the counter reaches
/// `i64::MAX` it falls back to the smallest free id from the current millisecond on.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
    taken: BTreeSet<i64>,
}

impl IdGenerator {
    /// Makes sure `id` is never handed out and later ids stay above it.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
        self.taken.insert(id);
    }

    pub fn observe_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids {
            self.observe(id);
        }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> i64 {
        let id = match self.last.checked_add(1) {
            Some(id) => id.max(now.timestamp_millis()),
            None => {
                warn!("Id counter is exhausted, searching for a free id");
                self.lowest_free(now.timestamp_millis())
            }
        };
        self.observe(id);
        id
    }

    /// Smallest positive id at or above `from` that isn't taken, wrapping around to 1.
    fn lowest_free(&self, from: i64) -> i64 {
        let mut candidate = from.max(1);
        for &taken in self.taken.range(candidate..) {
            if taken != candidate {
                break;
            }
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None if from > 1 => return self.lowest_free(1),
                None => break,
            }
        }
        candidate
    }
}
