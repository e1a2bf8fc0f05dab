use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{
    persistence::{auto_export::BACKUP_FILE_NAME, transaction::Transactor},
    screenshots::source::ScreenshotDirectory,
    store::{file::FileStore, Store},
    tracker::{data::TrackerData, Tracker},
    utils::clock::{Clock, DefaultClock},
};

/// Everything a command works against: the store, the screenshots and the clock.
pub struct Workspace<S> {
    transactor: Transactor<S>,
    screenshots: ScreenshotDirectory,
    clock: Arc<dyn Clock>,
}

impl Workspace<Arc<FileStore>> {
    pub fn open(dir: PathBuf, screenshots_dir: PathBuf) -> Result<Self> {
        let store = Arc::new(FileStore::new(dir.clone())?);
        Ok(Self::new(
            store,
            dir,
            ScreenshotDirectory::new(screenshots_dir),
            Arc::new(DefaultClock),
        ))
    }
}

impl<S: Store + Clone> Workspace<S> {
    pub fn new(
        store: S,
        dir: PathBuf,
        screenshots: ScreenshotDirectory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactor: Transactor::new(store, clock.clone(), dir.join(BACKUP_FILE_NAME)),
            screenshots,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    pub fn screenshots(&self) -> &ScreenshotDirectory {
        &self.screenshots
    }

    pub async fn load(&self) -> TrackerData {
        self.transactor.load().await
    }

    /// Runs `change` against the latest stored state and waits until every snapshot it
    /// committed is saved. The daemon can't write in between.
    pub async fn mutate<T>(&self, change: impl FnOnce(&mut Tracker) -> Result<T>) -> Result<T> {
        self.transactor.update(change).await?
    }
}

#[cfg(test)]
pub mod test_workspace {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use crate::{
        screenshots::source::ScreenshotDirectory, store::memory::MemoryStore,
        utils::clock::test_clock::ManualClock,
    };

    use super::Workspace;

    pub struct TestWorkspace {
        pub workspace: Workspace<Arc<MemoryStore>>,
        pub store: Arc<MemoryStore>,
        pub clock: ManualClock,
        pub dir: TempDir,
    }

    /// In-memory workspace starting Friday 2024-04-05 09:00 UTC, screenshots in a temp dir.
    pub fn test_workspace() -> TestWorkspace {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(MemoryStore::default());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 5, 9, 0, 0).unwrap());
        let workspace = Workspace::new(
            store.clone(),
            dir.path().to_path_buf(),
            ScreenshotDirectory::new(dir.path().join("screenshots")),
            Arc::new(clock.clone()),
        );
        TestWorkspace {
            workspace,
            store,
            clock,
            dir,
        }
    }
}
