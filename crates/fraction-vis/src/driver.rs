//! Tick driver: the clock behind timed playback.
//!
//! One tokio task per play session ticks the shared simulator at a fixed
//! interval, stamping each tick with the current time. Pausing, resetting,
//! starting a new session or dropping the driver cancels the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::sequencer::{TickOutcome, TickToken};
use crate::simulator::Simulator;

/// Simulator shared between the tick task and command handlers.
pub type SharedSimulator = Arc<RwLock<Simulator>>;

/// Default tick interval, roughly one display refresh at 60 Hz.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

struct TickSession {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TickSession {
    fn cancel(self) {
        let _ = self.cancel.send(true);
        self.handle.abort();
    }
}

/// Runs at most one tick task at a time for a shared simulator.
pub struct PlaybackDriver {
    simulator: SharedSimulator,
    tick_interval: Duration,
    session: Mutex<Option<TickSession>>,
}

impl PlaybackDriver {
    /// Create a driver. Nothing ticks until [`play`](Self::play).
    pub fn new(simulator: SharedSimulator, tick_interval: Duration) -> Self {
        Self {
            simulator,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            session: Mutex::new(None),
        }
    }

    /// Get the shared simulator.
    pub fn simulator(&self) -> &SharedSimulator {
        &self.simulator
    }

    /// Start timed playback, replacing any running tick task.
    pub async fn play(&self) {
        let mut session = self.session.lock().await;
        if let Some(previous) = session.take() {
            previous.cancel();
        }
        let token = self.simulator.write().await.play();
        *session = Some(self.spawn(token));
    }

    /// Cancel the tick task and pause the simulator.
    pub async fn pause(&self) {
        self.stop().await;
        self.simulator.write().await.pause();
    }

    /// Cancel the tick task and rewind the simulator.
    pub async fn reset(&self) {
        self.stop().await;
        self.simulator.write().await.reset();
    }

    /// Cancel the tick task, leaving the simulator as it is.
    pub async fn stop(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.cancel();
            tracing::debug!("Tick task cancelled");
        }
    }

    /// True while a tick task is alive.
    pub async fn is_running(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }

    fn spawn(&self, token: TickToken) -> TickSession {
        let (cancel, mut cancelled) = watch::channel(false);
        let simulator = self.simulator.clone();
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => {
                        let now = Instant::now().into_std();
                        let outcome = simulator.write().await.tick(token, now);
                        match outcome {
                            TickOutcome::Completed(_) | TickOutcome::Ignored => break,
                            TickOutcome::Advanced(change) => {
                                tracing::debug!(from = ?change.from, to = ?change.to, "Phase advanced");
                            }
                            TickOutcome::Progressed(_) => {}
                        }
                    }
                }
            }
            tracing::debug!("Tick task finished");
        });

        TickSession { cancel, handle }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.cancel();
        }
    }
}
