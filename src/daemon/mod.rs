//! The background process: stops timers when the user goes idle, takes periodic screenshots
//! and stops everything when the process is asked to exit.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use capture::{CaptureScheduler, DEFAULT_CAPTURE_DELAY_MS};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use watcher::IdleWatcher;

use crate::{
    idle_api::{GenericIdleProbe, IdleProbe},
    persistence::{auto_export::BACKUP_FILE_NAME, transaction::Transactor},
    screenshots::capture::{CommandCapture, ScreenshotCapture},
    store::{file::FileStore, Store},
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod capture;
pub mod idle;
pub mod shutdown;
pub mod watcher;

const DEFAULT_IDLE_CHECK_INTERVAL: Duration = Duration::from_secs(30);

pub struct DaemonConfig {
    pub dir: PathBuf,
    pub screenshots_dir: PathBuf,
    pub capture_command: Option<String>,
}

/// Represents the starting point for the daemon
pub async fn start_daemon(config: DaemonConfig) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Transactor::new(
        Arc::new(FileStore::new(config.dir.clone())?),
        clock.clone(),
        config.dir.join(BACKUP_FILE_NAME),
    );
    let probe = GenericIdleProbe::new()?;

    let capture = config.capture_command.as_deref().and_then(|command| {
        CommandCapture::from_command_line(command, config.screenshots_dir, clock.clone())
    });
    if capture.is_none() {
        info!("No capture command configured, screenshots are off");
    }

    let shutdown_token = CancellationToken::new();
    let (_, result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        run_services(
            store,
            Box::new(probe),
            capture.map(|c| Box::new(c) as Box<dyn ScreenshotCapture>),
            clock,
            shutdown_token,
        ),
    );
    result
}

/// Runs the idle watcher and the screenshot scheduler until `shutdown` is cancelled. Running
/// timers are stopped before returning. Every change goes through `store` as its own
/// transaction, so the cli can work against the same store in between.
async fn run_services<S: Store + Clone>(
    store: Transactor<S>,
    probe: Box<dyn IdleProbe>,
    capture: Option<Box<dyn ScreenshotCapture>>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
) -> Result<()> {
    let watcher = IdleWatcher::new(
        store.clone(),
        probe,
        shutdown.clone(),
        DEFAULT_IDLE_CHECK_INTERVAL,
        clock.clone(),
    );
    let scheduler = capture.map(|capture| {
        CaptureScheduler::new(
            store.clone(),
            capture,
            shutdown.clone(),
            DEFAULT_CAPTURE_DELAY_MS,
            clock.clone(),
        )
    });

    let (watch_result, capture_result) = tokio::join!(watcher.run(), async {
        match scheduler {
            Some(scheduler) => scheduler.run().await,
            None => Ok(()),
        }
    });
    if let Err(e) = watch_result {
        error!("Idle watcher got an error {e:?}");
    }
    if let Err(e) = capture_result {
        error!("Screenshot scheduler got an error {e:?}");
    }

    shutdown::stop_tracking(&store).await?;
    Ok(())
}
