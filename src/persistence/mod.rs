use anyhow::Result;
use module::SnapshotProcessor;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info};

use crate::tracker::data::Snapshot;

pub mod auto_export;
pub mod module;
pub mod store_save;
pub mod transaction;

/// Receives snapshots committed by the [Tracker](crate::tracker::Tracker) and hands them to a
/// processor. Snapshots that queued up while a write was in flight are skipped in favour of the
/// newest one. Runs until every sender is dropped.
pub struct PersistenceModule<Processor> {
    receiver: UnboundedReceiver<Snapshot>,
    processor: Processor,
}

impl<P: SnapshotProcessor> PersistenceModule<P> {
    pub fn new(receiver: UnboundedReceiver<Snapshot>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    fn latest(&mut self, mut snapshot: Snapshot) -> Snapshot {
        while let Ok(newer) = self.receiver.try_recv() {
            debug!("Skipping version {} in favour of {}", snapshot.version(), newer.version());
            snapshot = newer;
        }
        snapshot
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(snapshot) = self.receiver.recv().await {
            let snapshot = self.latest(snapshot);
            let version = snapshot.version();
            match self.processor.process_next(snapshot).await {
                Ok(_) => {
                    info!("Saved version {version}")
                }
                Err(e) => {
                    error!("Error saving version {version}: {e:?}")
                }
            }
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc;

    use crate::{
        store::{load_data, memory::MemoryStore},
        tracker::{data::TrackerData, Tracker},
        utils::{clock::test_clock::ManualClock, logging::TEST_LOGGING},
    };

    use super::{store_save::StoreSaver, PersistenceModule};

    #[tokio::test]
    async fn queued_snapshots_collapse_into_latest() -> Result<()> {
        let _ = *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 5, 9, 0, 0).unwrap());
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut tracker = Tracker::new(TrackerData::default(), Arc::new(clock), Box::new(sender));
        let project = tracker.add_project("Writing")?;
        let task = tracker.add_task(project, "Draft")?;
        tracker.start_session(task);
        let expected = tracker.snapshot();
        drop(tracker);

        PersistenceModule::new(receiver, StoreSaver::new(store.clone()))
            .run()
            .await?;

        // one snapshot, four keys
        assert_eq!(store.writes(), 4);
        assert_eq!(load_data(&store).await, *expected);
        Ok(())
    }

    #[tokio::test]
    async fn exits_without_snapshots() -> Result<()> {
        let store = Arc::new(MemoryStore::default());
        let (sender, receiver) = mpsc::unbounded_channel();
        drop(sender);

        PersistenceModule::new(receiver, StoreSaver::new(store.clone()))
            .run()
            .await?;
        assert_eq!(store.writes(), 0);
        Ok(())
    }
}
