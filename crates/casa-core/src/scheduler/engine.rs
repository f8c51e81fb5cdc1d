//! Scheduling engine
//!
//! Owns the schedule registry and runs the periodic evaluation loop:
//! - fixed-cadence ticks through an injectable clock
//! - consistent registry snapshots, evaluated in registration order
//! - detached fire-and-forget action dispatch
//! - cancellable loop with a blocking stop

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::types::{Result, Schedule, SchedulerError};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between evaluation passes
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
        }
    }
}

impl SchedulerConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interval between evaluation passes
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// Rule evaluation engine
pub struct Scheduler {
    schedules: Arc<RwLock<Vec<Arc<Schedule>>>>,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    terminated: CancellationToken,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Create a scheduler backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a scheduler with a custom time source
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            schedules: Arc::new(RwLock::new(Vec::new())),
            config: SchedulerConfig::default(),
            clock,
            cancel: CancellationToken::new(),
            terminated: CancellationToken::new(),
            loop_handle: Mutex::new(None),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a schedule to the registry.
    ///
    /// Safe before or after [`start`](Self::start); a running loop picks the
    /// schedule up on its next tick.
    pub async fn add_schedule(&self, schedule: Schedule) {
        let mut schedules = self.schedules.write().await;
        schedules.push(Arc::new(schedule));
    }

    /// Spawn the evaluation loop as a detached task and return immediately
    pub async fn start(&self) -> Result<()> {
        let mut handle = self.loop_handle.lock().await;
        if handle.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(tick_interval = ?self.config.tick_interval, "scheduler starting");

        let schedules = self.schedules.clone();
        let clock = self.clock.clone();
        let cancel = self.cancel.clone();
        let terminated = self.terminated.clone();
        let tick = self.config.tick_interval;
        *handle = Some(tokio::spawn(async move {
            // Cancelled on any loop exit, including a panic in a trigger or
            // filter callback, so embedders can observe a dead loop.
            let _guard = terminated.drop_guard();
            run_loop(schedules, clock, cancel, tick).await;
        }));
        Ok(())
    }

    /// Cancel the evaluation loop and wait for it to exit.
    ///
    /// Waits for the loop task only: previously dispatched actions are
    /// neither cancelled nor awaited, though they can observe shutdown
    /// through their token. A no-op when the loop never started.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let handle = self.loop_handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        info!("scheduler stopped");
    }

    /// Completes once the evaluation loop has exited, for any reason.
    ///
    /// Also fires when the loop dies on its own, e.g. a panicking trigger
    /// callback. A process that must not keep running with a dead scheduler
    /// races this against its shutdown signal and aborts when it wins.
    pub async fn terminated(&self) {
        self.terminated.cancelled().await;
    }

    /// Run one evaluation pass at `now`, exactly as a tick would
    #[cfg(test)]
    pub(crate) async fn evaluate_at(&self, now: DateTime<Local>) {
        evaluate(&self.schedules, &self.cancel, now).await;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Main evaluation loop: tick until cancelled
async fn run_loop(
    schedules: Arc<RwLock<Vec<Arc<Schedule>>>>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    tick: Duration,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("scheduler loop exiting");
                return;
            }
            _ = clock.after(tick) => {
                evaluate(&schedules, &cancel, clock.now()).await;
            }
        }
    }
}

/// One evaluation pass: snapshot the registry, then fire matching schedules.
async fn evaluate(
    schedules: &RwLock<Vec<Arc<Schedule>>>,
    cancel: &CancellationToken,
    now: DateTime<Local>,
) {
    // Copy under the read lock and release it before evaluating, so slow
    // trigger or filter callbacks never block registration.
    let snapshot: Vec<Arc<Schedule>> = schedules.read().await.clone();
    debug!(schedules = snapshot.len(), %now, "evaluation tick");

    for schedule in snapshot {
        if schedule.should_fire(now) && schedule.filters_pass(now) {
            info!(name = %schedule.name, %now, "schedule fired, dispatching action");
            tokio::spawn((schedule.action)(cancel.clone()));
            schedule.mark_triggered(now);
        }
    }
}
