//! Background purge of deleted tasks whose retention window has elapsed.

use super::lifecycle::TaskLifecycleService;
use crate::task::ports::TaskSnapshotStore;
use mockable::Clock;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Periodic retention sweeper bound to a lifecycle service.
pub struct RetentionSweeper<S, C>
where
    S: TaskSnapshotStore,
    C: Clock + Send + Sync,
{
    service: TaskLifecycleService<S, C>,
    interval: Duration,
}

impl<S, C> RetentionSweeper<S, C>
where
    S: TaskSnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a sweeper ticking every `interval`.
    ///
    /// A zero interval falls back to [`DEFAULT_SWEEP_INTERVAL`].
    #[must_use]
    pub fn new(service: TaskLifecycleService<S, C>, interval: Duration) -> Self {
        Self {
            service,
            interval: if interval.is_zero() {
                DEFAULT_SWEEP_INTERVAL
            } else {
                interval
            },
        }
    }

    /// Returns the sweep interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts sweeping on the current tokio runtime.
    ///
    /// The first sweep runs immediately. The task stops when the returned
    /// handle is shut down or dropped.
    #[must_use]
    pub fn spawn(self) -> SweeperHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(token.clone()));
        SweeperHandle {
            token,
            task: Some(task),
        }
    }

    async fn run(self, token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.interval, "retention sweeper started");
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    match self.service.sweep_expired().await {
                        Ok(0) => {}
                        Ok(count) => debug!(count, "sweeper tick purged tasks"),
                        Err(err) => warn!(error = %err, "retention sweep failed"),
                    }
                }
            }
        }
        info!("retention sweeper stopped");
    }
}

/// Handle to a running sweeper.
///
/// Dropping the handle cancels the sweeper without waiting for it.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Returns whether the sweeper task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the sweeper and waits for the current sweep to complete.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the sweeper task panicked.
    pub async fn shutdown(mut self) -> Result<(), JoinError> {
        self.token.cancel();
        match self.task.take() {
            Some(task) => task.await,
            None => Ok(()),
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
