use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    fs::operations::{read_optional, write_atomically, FileLock},
    tracker::error::{TrackerError, TrackerResult},
};

use super::{Access, Store, StoreKey};

const LOCK_FILE: &str = ".store.lock";

/// The main realization of [Store]: one `<key>.json` file per key inside a directory. The
/// [lock](Store::lock) is an advisory lock on a file in the same directory, so the cli and the
/// daemon exclude each other.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }
}

impl Store for FileStore {
    type Lock = FileLock;

    async fn lock(&self, access: Access) -> TrackerResult<FileLock> {
        let path = self.lock_path();
        let lock = match access {
            Access::Shared => FileLock::shared(&path).await,
            Access::Exclusive => FileLock::exclusive(&path).await,
        };
        lock.map_err(|e| TrackerError::storage("store lock", e))
    }

    async fn unlock(&self, lock: FileLock) {
        if let Err(e) = lock.release().await {
            warn!("Failed to release store lock: {e}");
        }
    }

    async fn get(&self, key: StoreKey) -> TrackerResult<Option<String>> {
        let path = self.path(key);
        debug!("Reading {path:?}");
        read_optional(&path)
            .await
            .map_err(|e| TrackerError::storage(key.as_str(), e))
    }

    async fn set(&self, key: StoreKey, blob: String) -> TrackerResult<()> {
        let path = self.path(key);
        debug!("Writing {path:?}");
        write_atomically(&path, blob.as_bytes())
            .await
            .map_err(|e| TrackerError::storage(key.as_str(), e))
    }
}
