//! Injectable time source for the scheduling engine
//!
//! The evaluation loop observes time only through [`Clock`], so day-boundary
//! and threshold-crossing behavior can be tested without real delays.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::Notify;

/// Source of "now" and one-shot timed waits
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Local>;

    /// Resolve once `duration` has elapsed
    async fn after(&self, duration: Duration);
}

/// Wall-clock time source
#[derive(Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn after(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Manually driven time source for deterministic tests.
///
/// `now` returns a held instant that only moves when [`advance`] or [`set`]
/// is called; `after` resolves once the held instant reaches the deadline
/// computed when the wait began.
///
/// [`advance`]: ManualClock::advance
/// [`set`]: ManualClock::set
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
    advanced: Notify,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
            advanced: Notify::new(),
        }
    }

    /// Move the clock forward by `duration` and wake pending waits
    pub fn advance(&self, duration: Duration) {
        {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(duration).expect("duration out of range");
        }
        self.advanced.notify_waiters();
    }

    /// Jump the clock to `instant` and wake pending waits
    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock().unwrap() = instant;
        self.advanced.notify_waiters();
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }

    async fn after(&self, duration: Duration) {
        let deadline =
            self.now() + chrono::Duration::from_std(duration).expect("duration out of range");
        loop {
            // Register for the wakeup before re-checking so an advance
            // between the check and the await is not lost.
            let advanced = self.advanced.notified();
            if self.now() >= deadline {
                return;
            }
            advanced.await;
        }
    }
}
