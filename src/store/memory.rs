use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::tracker::error::TrackerResult;

use super::{Access, Store, StoreKey};

/// [Store] kept in memory. Counts writes so tests can see how often persistence ran. Shared and
/// exclusive locks are the same mutex.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
    lock: Arc<AsyncMutex<()>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Store for MemoryStore {
    type Lock = OwnedMutexGuard<()>;

    async fn lock(&self, _access: Access) -> TrackerResult<Self::Lock> {
        Ok(self.lock.clone().lock_owned().await)
    }

    async fn unlock(&self, lock: Self::Lock) {
        drop(lock);
    }

    async fn get(&self, key: StoreKey) -> TrackerResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(&key).cloned())
    }

    async fn set(&self, key: StoreKey, blob: String) -> TrackerResult<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, blob);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
