use std::path::PathBuf;

use anyhow::Result;
use tracing::error;

use crate::{store::exchange::export_to_file, tracker::data::Snapshot};

use super::module::SnapshotProcessor;

pub const BACKUP_FILE_NAME: &str = "timetally-backup.json";

/// Writes a backup next to every save while the `autoExport` setting is on.
pub struct AutoExport<P> {
    inner: P,
    path: PathBuf,
}

impl<P: SnapshotProcessor> AutoExport<P> {
    pub fn new(inner: P, path: PathBuf) -> Self {
        Self { inner, path }
    }
}

impl<P: SnapshotProcessor> SnapshotProcessor for AutoExport<P> {
    async fn process_next(&mut self, snapshot: Snapshot) -> Result<()> {
        let export = snapshot.settings.auto_export.then(|| snapshot.clone());
        self.inner.process_next(snapshot).await?;
        if let Some(snapshot) = export {
            // A failed backup never fails the save itself.
            if let Err(e) = export_to_file(&snapshot, &self.path).await {
                error!("Auto export failed {e:?}");
            }
        }
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        self.inner.finalize().await
    }
}
