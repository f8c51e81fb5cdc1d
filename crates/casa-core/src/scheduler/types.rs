//! Schedule model and error definitions
//!
//! Contains the core types used by the scheduling engine.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::triggers::{Filter, Trigger};

pub use tokio_util::sync::CancellationToken;

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Scheduler error types
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The evaluation loop is already running
    #[error("scheduler is already running")]
    AlreadyRunning,
}

/// Future type returned by action callbacks
pub type ActionFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback dispatched when a schedule fires.
///
/// Receives a clone of the engine's shutdown token so long-running actions
/// can observe cancellation. The engine never awaits the returned future and
/// never observes its outcome; actions handle and log their own errors.
pub type Action = Arc<dyn Fn(CancellationToken) -> ActionFuture + Send + Sync>;

/// How multiple filters on a schedule combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLogic {
    /// All filters must pass
    #[default]
    And,
    /// At least one filter must pass
    Or,
}

/// One automation rule: a trigger, optional filters, and an action
pub struct Schedule {
    /// Human-readable name, for logging only; uniqueness is not enforced
    pub name: String,
    /// How today's fire instant is computed
    pub trigger: Trigger,
    /// How `filters` combine
    pub filter_logic: FilterLogic,
    /// Secondary gating conditions; empty means always pass
    pub filters: Vec<Filter>,
    /// Callback dispatched when the schedule fires
    pub action: Action,
    // Written only by the evaluation loop, at most once per local calendar
    // day. Behind its own lock so the loop can update it through a registry
    // snapshot while other tasks hold references to the schedule.
    last_triggered: Mutex<Option<DateTime<Local>>>,
}

impl Schedule {
    /// Create a schedule with the default AND filter logic and no filters
    pub fn new(name: impl Into<String>, trigger: Trigger, action: Action) -> Self {
        Self {
            name: name.into(),
            trigger,
            filter_logic: FilterLogic::default(),
            filters: Vec::new(),
            action,
            last_triggered: Mutex::new(None),
        }
    }

    /// Set the filter combination logic
    pub fn with_filter_logic(mut self, logic: FilterLogic) -> Self {
        self.filter_logic = logic;
        self
    }

    /// Add a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// When the schedule last fired, if ever
    pub fn last_triggered(&self) -> Option<DateTime<Local>> {
        *self.last_triggered.lock().unwrap()
    }

    /// Record that the schedule fired at `now`
    pub(crate) fn mark_triggered(&self, now: DateTime<Local>) {
        *self.last_triggered.lock().unwrap() = Some(now);
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("filter_logic", &self.filter_logic)
            .field("filters", &self.filters)
            .field("last_triggered", &self.last_triggered)
            .finish_non_exhaustive()
    }
}
