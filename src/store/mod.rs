//! Durable mirror of the tracker state.
//!
//! The store is a plain key-value map over four fixed keys. Collections are JSON arrays and
//! settings a JSON object. Reading never fails the caller: anything absent or broken reads as
//! empty data or default settings.
//!
//! Several processes share one store. [get](Store::get) and [set](Store::set) don't lock on
//! their own; [load_data] and [save_data] take the store lock around all four keys, and a
//! read-modify-write holds the exclusive lock from the first read to the last write (see
//! [Transactor](crate::persistence::transaction::Transactor)).

use std::{fmt::Display, future::Future, ops::Deref};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::tracker::{
    data::{parse_collection, TrackerData},
    error::{TrackerError, TrackerResult},
    settings::Settings,
};

pub mod exchange;
pub mod file;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Projects,
    Tasks,
    Sessions,
    Settings,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::Projects,
        StoreKey::Tasks,
        StoreKey::Sessions,
        StoreKey::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Projects => "projects",
            StoreKey::Tasks => "tasks",
            StoreKey::Sessions => "sessions",
            StoreKey::Settings => "settings",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Shared,
    Exclusive,
}

/// Interface for abstracting the key-value storage.
pub trait Store {
    /// Held for as long as the caller needs the store to itself.
    type Lock: Send;

    /// Waits until nobody holds a conflicting lock.
    fn lock(&self, access: Access) -> impl Future<Output = TrackerResult<Self::Lock>> + Send;

    fn unlock(&self, lock: Self::Lock) -> impl Future<Output = ()> + Send;

    fn get(&self, key: StoreKey) -> impl Future<Output = TrackerResult<Option<String>>> + Send;

    fn set(&self, key: StoreKey, blob: String) -> impl Future<Output = TrackerResult<()>> + Send;
}

impl<T: Deref> Store for T
where
    T::Target: Store,
{
    type Lock = <T::Target as Store>::Lock;

    fn lock(&self, access: Access) -> impl Future<Output = TrackerResult<Self::Lock>> + Send {
        self.deref().lock(access)
    }

    fn unlock(&self, lock: Self::Lock) -> impl Future<Output = ()> + Send {
        self.deref().unlock(lock)
    }

    fn get(&self, key: StoreKey) -> impl Future<Output = TrackerResult<Option<String>>> + Send {
        self.deref().get(key)
    }

    fn set(&self, key: StoreKey, blob: String) -> impl Future<Output = TrackerResult<()>> + Send {
        self.deref().set(key, blob)
    }
}

async fn read_value(store: &impl Store, key: StoreKey) -> Option<Value> {
    let blob = match store.get(key).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            debug!("Nothing stored under {key}");
            return None;
        }
        Err(e) => {
            warn!("Failed to read {key}, using defaults: {e}");
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Stored {key} is not valid json, using defaults: {e}");
            None
        }
    }
}

/// Reads everything the tracker needs under the shared lock. Never fails; see the module docs.
pub async fn load_data(store: &impl Store) -> TrackerData {
    match store.lock(Access::Shared).await {
        Ok(lock) => {
            let data = read_data(store).await;
            store.unlock(lock).await;
            data
        }
        Err(e) => {
            warn!("Reading without the store lock: {e}");
            read_data(store).await
        }
    }
}

/// [load_data] for callers that already hold the lock.
pub async fn read_data(store: &impl Store) -> TrackerData {
    let mut data = TrackerData::default();
    if let Some(v) = read_value(store, StoreKey::Projects).await {
        data.projects = parse_collection(StoreKey::Projects.as_str(), v);
    }
    if let Some(v) = read_value(store, StoreKey::Tasks).await {
        data.tasks = parse_collection(StoreKey::Tasks.as_str(), v);
    }
    if let Some(v) = read_value(store, StoreKey::Sessions).await {
        data.sessions = parse_collection(StoreKey::Sessions.as_str(), v);
    }
    if let Some(v) = read_value(store, StoreKey::Settings).await {
        data.settings = Settings::from_value(&v);
    }
    data
}

fn encode(key: StoreKey, value: &impl Serialize) -> TrackerResult<String> {
    serde_json::to_string(value).map_err(|source| TrackerError::Serialization {
        context: key.to_string(),
        source,
    })
}

/// Writes all four keys under the exclusive lock.
pub async fn save_data(store: &impl Store, data: &TrackerData) -> TrackerResult<()> {
    let lock = store.lock(Access::Exclusive).await?;
    let result = write_data(store, data).await;
    store.unlock(lock).await;
    result
}

/// [save_data] for callers that already hold the exclusive lock.
pub async fn write_data(store: &impl Store, data: &TrackerData) -> TrackerResult<()> {
    store
        .set(StoreKey::Projects, encode(StoreKey::Projects, &data.projects)?)
        .await?;
    store
        .set(StoreKey::Tasks, encode(StoreKey::Tasks, &data.tasks)?)
        .await?;
    store
        .set(StoreKey::Sessions, encode(StoreKey::Sessions, &data.sessions)?)
        .await?;
    store
        .set(StoreKey::Settings, encode(StoreKey::Settings, &data.settings)?)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::tracker::{
        data::TrackerData,
        entities::{Project, ProjectId, Session, SessionId, TaskId},
        settings::Settings,
    };

    use super::{load_data, memory::MemoryStore, save_data, Store, StoreKey};

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let store = MemoryStore::default();
        assert_eq!(load_data(&store).await, TrackerData::default());
    }

    #[tokio::test]
    async fn broken_values_degrade_to_defaults() {
        let store = MemoryStore::default();
        store.set(StoreKey::Projects, "{{{".into()).await.unwrap();
        store.set(StoreKey::Tasks, "{}".into()).await.unwrap();
        store
            .set(
                StoreKey::Sessions,
                r#"[{"id":1.5,"taskId":1,"startTime":"2024-04-05T09:00:00Z"},
                    {"id":2,"taskId":1,"startTime":"yesterday"},
                    {"id":3,"taskId":1,"startTime":"2024-04-05T09:00:00Z","endTime":null}]"#
                    .into(),
            )
            .await
            .unwrap();
        store.set(StoreKey::Settings, "42".into()).await.unwrap();

        let data = load_data(&store).await;
        assert!(data.projects.is_empty());
        assert!(data.tasks.is_empty());
        assert_eq!(data.sessions.len(), 1);
        assert_eq!(data.sessions[0].id, SessionId(3));
        assert_eq!(data.settings, Settings::default());
    }

    #[tokio::test]
    async fn saved_data_loads_back() {
        let store = MemoryStore::default();
        let data = TrackerData {
            projects: vec![Project {
                id: ProjectId(1),
                name: "Writing".into(),
                completed: true,
            }],
            sessions: vec![Session {
                id: SessionId(2),
                task_id: TaskId(9),
                start_time: Utc.with_ymd_and_hms(2024, 4, 5, 9, 0, 0).unwrap(),
                end_time: None,
            }],
            ..Default::default()
        };

        save_data(&store, &data).await.unwrap();
        assert_eq!(load_data(&store).await, data);

        let raw = store.get(StoreKey::Sessions).await.unwrap().unwrap();
        assert!(raw.contains("\"taskId\":9"));
        assert!(raw.contains("\"endTime\":null"));
    }
}
