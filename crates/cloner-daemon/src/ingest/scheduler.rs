//! Run scheduler
//!
//! Fires one run immediately and then one per interval. Runs never overlap:
//! a tick that finds the previous run still in flight is skipped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use super::orchestrator::{IngestionOrchestrator, RunSummary};
use crate::error::RunError;

/// Single-run lease shared by every trigger
#[derive(Clone, Default)]
pub struct RunGuard {
    lock: Arc<Mutex<()>>,
}

/// Held for the duration of a run
pub type RunLease = OwnedMutexGuard<()>;

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another run holds the lease
    pub fn try_acquire(&self) -> Option<RunLease> {
        self.lock.clone().try_lock_owned().ok()
    }

    /// Wait for any in-flight run to finish, then hold the lease
    pub async fn acquire(&self) -> RunLease {
        self.lock.clone().lock_owned().await
    }

    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

pub struct RunScheduler {
    orchestrator: Arc<IngestionOrchestrator>,
    interval: Duration,
    guard: RunGuard,
}

impl RunScheduler {
    pub fn new(orchestrator: Arc<IngestionOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
            guard: RunGuard::new(),
        }
    }

    pub fn guard(&self) -> RunGuard {
        self.guard.clone()
    }

    /// Spawn a run unless one is already in flight
    pub fn trigger(&self) -> Option<JoinHandle<Result<RunSummary, RunError>>> {
        let Some(lease) = self.guard.try_acquire() else {
            warn!("Previous run still in progress, skipping this tick");
            return None;
        };

        let orchestrator = self.orchestrator.clone();

        Some(tokio::spawn(async move {
            let _lease = lease;
            orchestrator.run().await
        }))
    }

    /// Start the periodic trigger; the first tick fires immediately
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Scheduler started, cloning media every {}s",
                self.interval.as_secs()
            );

            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if let Some(handle) = self.trigger() {
                    tokio::spawn(async move {
                        match handle.await {
                            Ok(Ok(_)) => {},
                            Ok(Err(e)) => warn!("Run failed: {}", e),
                            Err(e) => error!("Run task panicked: {}", e),
                        }
                    });
                }
            }
        })
    }
}
