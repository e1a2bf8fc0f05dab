use anyhow::Result;
use tracing::debug;

use crate::{
    store::{write_data, Store},
    tracker::data::Snapshot,
};

use super::module::SnapshotProcessor;

/// Bridges [PersistenceModule](super::PersistenceModule) and a [Store]. Writes don't take the
/// store lock, the caller holds it for the whole change.
pub struct StoreSaver<S: Store> {
    store: S,
    last_saved: Option<u64>,
}

impl<S: Store> StoreSaver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_saved: None,
        }
    }
}

impl<S: Store> SnapshotProcessor for StoreSaver<S> {
    async fn process_next(&mut self, snapshot: Snapshot) -> Result<()> {
        if self.last_saved == Some(snapshot.version()) {
            debug!("Version {} is already saved", snapshot.version());
            return Ok(());
        }
        write_data(&self.store, &snapshot).await?;
        self.last_saved = Some(snapshot.version());
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
