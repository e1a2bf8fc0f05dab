use std::{ops::RangeInclusive, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    persistence::transaction::Transactor,
    screenshots::{artifact::session_label, capture::ScreenshotCapture},
    store::Store,
    utils::clock::Clock,
};

/// Screenshots are taken somewhere between 10 and 15 minutes apart.
pub const DEFAULT_CAPTURE_DELAY_MS: RangeInclusive<u64> = 10 * 60 * 1000..=15 * 60 * 1000;

/// Periodically captures the screen while a timer runs and screenshots are enabled.
pub struct CaptureScheduler<S: Store> {
    store: Transactor<S>,
    capture: Box<dyn ScreenshotCapture>,
    shutdown: CancellationToken,
    delay_ms: RangeInclusive<u64>,
    clock: Arc<dyn Clock>,
}

impl<S: Store + Clone> CaptureScheduler<S> {
    pub fn new(
        store: Transactor<S>,
        capture: Box<dyn ScreenshotCapture>,
        shutdown: CancellationToken,
        delay_ms: RangeInclusive<u64>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            capture,
            shutdown,
            delay_ms,
            clock,
        }
    }

    /// Label of the running task when a screenshot should be taken now.
    async fn pending_label(&self) -> Option<String> {
        let data = self.store.load().await;
        if !data.settings.screenshot_enabled {
            debug!("Screenshots are disabled");
            return None;
        }
        let task = data.running_task()?;
        let project = data.project(task.project_id);
        Some(session_label(
            project.map(|p| p.name.as_str()),
            Some(task.title.as_str()),
        ))
    }

    /// Takes one screenshot if a task is running. Failures are logged and tracking goes on.
    pub async fn capture_once(&self) -> Option<PathBuf> {
        let label = self.pending_label().await?;
        match self.capture.capture(&label).await {
            Ok(path) => {
                info!("Screenshot taken during {label}");
                Some(path)
            }
            Err(e) => {
                error!("Failed to take screenshot during {label}: {e}");
                None
            }
        }
    }

    fn next_delay(&self) -> Duration {
        Duration::from_millis(rand::thread_rng().gen_range(self.delay_ms.clone()))
    }

    pub async fn run(self) -> Result<()> {
        loop {
            let delay = self.next_delay();
            debug!("Next screenshot in {delay:?}");

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep(delay) => ()
            }

            self.capture_once().await;
        }
    }
}
