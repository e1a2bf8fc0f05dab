use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    store::{load_data, read_data, Access, Store},
    tracker::{data::TrackerData, Tracker},
    utils::clock::Clock,
};

use super::{auto_export::AutoExport, store_save::StoreSaver, PersistenceModule};

/// Runs changes against the store one at a time across processes. A change loads the stored
/// state, mutates it through a short lived [Tracker] and saves every committed snapshot, all
/// under the store's exclusive lock.
#[derive(Clone)]
pub struct Transactor<S> {
    store: S,
    clock: Arc<dyn Clock>,
    backup: PathBuf,
}

impl<S: Store + Clone> Transactor<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, backup: PathBuf) -> Self {
        Self {
            store,
            clock,
            backup,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current stored state, repaired the same way the tracker repairs it.
    pub async fn load(&self) -> TrackerData {
        let mut data = load_data(&self.store).await;
        data.normalize(self.clock.time());
        data
    }

    /// Applies `change` to the latest stored state and returns once it is saved. Nobody else
    /// can write between the read and the last write.
    pub async fn update<T>(&self, change: impl FnOnce(&mut Tracker) -> T) -> Result<T> {
        let lock = self.store.lock(Access::Exclusive).await?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let mut tracker = Tracker::new(
            read_data(&self.store).await,
            self.clock.clone(),
            Box::new(sender),
        );
        let result = change(&mut tracker);
        debug!("Change ended at version {}", tracker.version());
        drop(tracker);

        let saved = PersistenceModule::new(
            receiver,
            AutoExport::new(StoreSaver::new(self.store.clone()), self.backup.clone()),
        )
        .run()
        .await;
        self.store.unlock(lock).await;
        saved.map(|_| result)
    }
}
