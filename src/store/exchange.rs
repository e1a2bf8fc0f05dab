//! Backup files: the whole state as one JSON document.

use std::path::Path;

use tracing::info;

use crate::{
    fs::operations::{read_optional, write_atomically},
    tracker::{
        data::{DataBundle, TrackerData},
        error::{TrackerError, TrackerResult},
    },
};

pub fn export_json(data: &TrackerData) -> TrackerResult<String> {
    serde_json::to_string_pretty(&DataBundle::from(data)).map_err(|source| {
        TrackerError::Serialization {
            context: "export".into(),
            source,
        }
    })
}

pub async fn export_to_file(data: &TrackerData, path: &Path) -> TrackerResult<()> {
    let contents = export_json(data)?;
    write_atomically(path, contents.as_bytes())
        .await
        .map_err(|e| TrackerError::storage(path.display().to_string(), e))?;
    info!("Exported data to {path:?}");
    Ok(())
}

/// Reads a backup. A missing or unreadable file is a storage error, a file that is not a JSON
/// object is an import format error.
pub async fn read_import_file(path: &Path) -> TrackerResult<DataBundle> {
    let contents = read_optional(path)
        .await
        .map_err(|e| TrackerError::storage(path.display().to_string(), e))?
        .ok_or_else(|| {
            TrackerError::storage(
                path.display().to_string(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )
        })?;
    DataBundle::from_json(&contents)
}
