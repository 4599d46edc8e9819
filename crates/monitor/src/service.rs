//! Monitor Service
//!
//! Async polling loop around a shared `CrisisMonitor`. Pulls observations
//! from a `ReadingsSource` whenever a check is due, accepts forced checks and
//! shutdown over a command channel, and broadcasts every fresh result.

use crate::error::{MonitorError, Result};
use crate::monitor::CrisisMonitor;
use crate::result::AggregationResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, mpsc};
use vigil_ports::ReadingsSource;

/// Result broadcast buffer
const RESULT_CHANNEL_CAPACITY: usize = 64;

/// Command channel buffer
const COMMAND_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Run a pass now regardless of schedule
    ForceCheck,
    Shutdown,
}

/// Caller side of a running service
#[derive(Clone)]
pub struct MonitorHandle {
    commands: mpsc::Sender<MonitorCommand>,
    results: broadcast::Sender<AggregationResult>,
}

impl MonitorHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<AggregationResult> {
        self.results.subscribe()
    }

    pub async fn force_check(&self) -> Result<()> {
        self.send(MonitorCommand::ForceCheck).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(MonitorCommand::Shutdown).await
    }

    async fn send(&self, command: MonitorCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| MonitorError::ServiceStopped)
    }
}

pub struct MonitorService {
    monitor: Arc<RwLock<CrisisMonitor>>,
    source: Arc<dyn ReadingsSource>,
    tick: Duration,
    commands: mpsc::Receiver<MonitorCommand>,
    results: broadcast::Sender<AggregationResult>,
}

impl MonitorService {
    /// Create the service and its handle.
    ///
    /// `tick` is how often the loop asks the monitor whether a check is due.
    pub fn new(
        monitor: Arc<RwLock<CrisisMonitor>>,
        source: Arc<dyn ReadingsSource>,
        tick: Duration,
    ) -> (Self, MonitorHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (result_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        let handle = MonitorHandle {
            commands: command_tx,
            results: result_tx.clone(),
        };
        let service = Self {
            monitor,
            source,
            tick,
            commands: command_rx,
            results: result_tx,
        };
        (service, handle)
    }

    /// Run until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        log::info!(
            "[MONITOR] Service started (source {}, tick {:?})",
            self.source.name(),
            self.tick
        );
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll(false).await;
                }
                command = self.commands.recv() => {
                    match command {
                        Some(MonitorCommand::ForceCheck) => self.poll(true).await,
                        Some(MonitorCommand::Shutdown) | None => break,
                    }
                }
            }
        }

        log::info!("[MONITOR] Service stopped");
    }

    async fn poll(&self, force: bool) {
        if !force && !self.monitor.read().await.is_due() {
            return;
        }

        let observation = match self.source.fetch().await {
            Ok(observation) => observation,
            Err(e) => {
                log::warn!("[MONITOR] {} fetch failed: {}", self.source.name(), e);
                return;
            }
        };

        // Scoring and detection are CPU-bound; keep them off the async workers
        let monitor = Arc::clone(&self.monitor);
        let pass = tokio::task::spawn_blocking(move || {
            monitor
                .blocking_write()
                .check(&observation.readings, &observation.series, force)
        });
        let result = match pass.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("[MONITOR] Pass aborted: {}", e);
                return;
            }
        };

        // No subscribers is not an error
        let _ = self.results.send(result);
    }
}
