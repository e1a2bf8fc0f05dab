use anyhow::Result;

use crate::tracker::data::Snapshot;

/// Represents a destination for committed snapshots. Local store saving is the only one for
/// now, an auto export could be another.
pub trait SnapshotProcessor {
    fn process_next(&mut self, snapshot: Snapshot) -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
