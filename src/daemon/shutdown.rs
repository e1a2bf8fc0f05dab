use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{persistence::transaction::Transactor, store::Store};

/// Detects signals sent to the process and cancels `cancelation` when one arrives. Returns
/// early if something else cancels first.
///
/// On Windows detached processes can't detect signals sent to them, so `timetally kill` ends
/// up terminating the process forcefully there.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received ctrl-c");
        },
        _ = terminate() => {
            info!("Received termination signal");
        },
        _ = cancelation.cancelled() => return,
    };
    cancelation.cancel();
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            error!("Can't listen for SIGTERM {e:?}");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// Closes every open session against the latest stored state. Runs once the daemon is going
/// down so no timer keeps counting while nothing watches it.
pub async fn stop_tracking<S: Store + Clone>(store: &Transactor<S>) -> Result<usize> {
    let stopped = store.update(|tracker| tracker.stop_all_sessions()).await?;
    info!("Stopped {stopped} sessions on shutdown");
    Ok(stopped)
}
