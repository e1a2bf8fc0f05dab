use std::{future::Future, io::ErrorKind, path::PathBuf};

use futures::TryStreamExt;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{debug, info, warn};

use crate::tracker::error::{TrackerError, TrackerResult};

use super::artifact::{is_artifact_path, ArtifactName};

/// Where screenshots can be listed from and removed.
pub trait ArtifactSource {
    /// Every artifact currently available. Listing problems produce an empty list.
    fn list(&self) -> impl Future<Output = Vec<ArtifactName>>;

    fn delete(&self, identifier: &str) -> impl Future<Output = TrackerResult<()>>;
}

/// Screenshots stored as files in one directory.
pub struct ScreenshotDirectory {
    dir: PathBuf,
}

impl ScreenshotDirectory {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    async fn list_inner(&self) -> Result<Vec<ArtifactName>, std::io::Error> {
        let entries = ReadDirStream::new(tokio::fs::read_dir(&self.dir).await?);
        let paths: Vec<PathBuf> = entries.map_ok(|e| e.path()).try_collect().await?;

        let mut artifacts: Vec<ArtifactName> = paths
            .iter()
            .filter(|p| is_artifact_path(p))
            .filter_map(|p| p.to_str().map(ArtifactName::parse))
            .collect();
        artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(artifacts)
    }
}

impl ArtifactSource for ScreenshotDirectory {
    async fn list(&self) -> Vec<ArtifactName> {
        match self.list_inner().await {
            Ok(v) => {
                debug!("Found {} screenshots in {:?}", v.len(), self.dir);
                v
            }
            Err(e) if e.kind() == ErrorKind::NotFound => vec![],
            Err(e) => {
                warn!("Can't list screenshots in {:?}: {e}", self.dir);
                vec![]
            }
        }
    }

    async fn delete(&self, identifier: &str) -> TrackerResult<()> {
        let name = ArtifactName::parse(identifier);
        if name.file_name != identifier || !is_artifact_path(std::path::Path::new(identifier)) {
            return Err(TrackerError::InvalidArtifact(identifier.into()));
        }
        let path = self.dir.join(&name.file_name);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| TrackerError::storage(path.display().to_string(), e))?;
        info!("Deleted screenshot {name}");
        Ok(())
    }
}
