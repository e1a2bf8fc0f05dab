use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    tracker::error::{TrackerError, TrackerResult},
    utils::clock::Clock,
};

use super::artifact::capture_file_name;

/// Takes a screenshot labelled with the running session and returns where it was saved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScreenshotCapture: Send + Sync {
    async fn capture(&self, label: &str) -> TrackerResult<PathBuf>;
}

/// Captures by running an external program. The destination path is appended as the last
/// argument, e.g. `grim` or `import -window root`.
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl CommandCapture {
    /// `None` for a blank command line.
    pub fn from_command_line(command: &str, dir: PathBuf, clock: Arc<dyn Clock>) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            dir,
            clock,
        })
    }
}

#[async_trait]
impl ScreenshotCapture for CommandCapture {
    async fn capture(&self, label: &str) -> TrackerResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| TrackerError::storage(self.dir.display().to_string(), e))?;

        let path = self.dir.join(capture_file_name(label, self.clock.time()));
        debug!("Running {} for {path:?}", self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| TrackerError::Capture(format!("failed to run {}: {e}", self.program)))?;

        if !status.success() {
            return Err(TrackerError::Capture(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        info!("Captured {path:?}");
        Ok(path)
    }
}
