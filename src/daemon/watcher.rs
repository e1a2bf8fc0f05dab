use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    idle_api::IdleProbe, persistence::transaction::Transactor, store::Store, utils::clock::Clock,
};

use super::idle::IdleEvaluator;

/// Stops every running timer once the user has been idle for longer than the configured
/// timeout. Each check reads the store, so timers started by other processes are seen.
pub struct IdleWatcher<S: Store> {
    store: Transactor<S>,
    probe: Box<dyn IdleProbe>,
    shutdown: CancellationToken,
    check_frequency: Duration,
    clock: Arc<dyn Clock>,
}

impl<S: Store + Clone> IdleWatcher<S> {
    pub fn new(
        store: Transactor<S>,
        probe: Box<dyn IdleProbe>,
        shutdown: CancellationToken,
        check_frequency: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            probe,
            shutdown,
            check_frequency,
            clock,
        }
    }

    /// Returns how many sessions were stopped.
    pub async fn check(&mut self) -> Result<usize> {
        let data = self.store.load().await;
        if data.open_session().is_none() {
            debug!("Nothing is running");
            return Ok(0);
        }

        let evaluator = IdleEvaluator::from_minutes(data.settings.idle_timeout);
        let idle_ms = self.probe.idle_time()?;
        if !evaluator.is_idle(idle_ms) {
            return Ok(0);
        }

        info!("User is idle for {idle_ms}ms, stopping timers");
        self.store.update(|tracker| tracker.stop_all_sessions()).await
    }

    /// Executes the watcher loop until shutdown.
    pub async fn run(mut self) -> Result<()> {
        let mut check_point = self.clock.instant();
        loop {
            check_point += self.check_frequency;

            if let Err(e) = self.check().await {
                error!("Encountered an error during idle check {:?}", e)
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(check_point) => ()
            }
        }
    }
}
