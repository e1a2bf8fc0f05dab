use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, trace};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(20);

/// Advisory lock held on a dedicated lock file for as long as the value lives.
pub struct FileLock {
    file: File,
}

impl FileLock {
    async fn open(path: &Path) -> Result<File, io::Error> {
        File::options()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)
            .await
    }

    /// Polls `try_lock` so a lock held elsewhere in this process doesn't block the runtime.
    async fn acquire(
        path: &Path,
        try_lock: impl Fn(&File) -> Result<(), io::Error>,
    ) -> Result<Self, io::Error> {
        let file = Self::open(path).await?;
        let contended = fs4::lock_contended_error().kind();
        loop {
            match try_lock(&file) {
                Ok(()) => return Ok(Self { file }),
                Err(e) if e.kind() == contended => {
                    trace!("Waiting for {path:?}");
                    tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn shared(path: &Path) -> Result<Self, io::Error> {
        Self::acquire(path, |file| file.try_lock_shared()).await
    }

    pub async fn exclusive(path: &Path) -> Result<Self, io::Error> {
        Self::acquire(path, |file| file.try_lock_exclusive()).await
    }

    pub async fn release(self) -> Result<(), io::Error> {
        self.file.unlock_async().await
    }
}

/// Reads the whole file. A missing file is `None` rather than an error.
pub async fn read_optional(path: &Path) -> Result<Option<String>, io::Error> {
    let mut file = match File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents).await?;
    Ok(Some(contents))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the file contents so that readers see either the old or the new version, never a
/// partial write.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let temporary = temporary_path(path);
    debug!("Writing {path:?} through {temporary:?}");

    let mut file = File::create(&temporary).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temporary, path).await
}
