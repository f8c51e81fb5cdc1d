//! Rule-based automation scheduling
//!
//! Evaluates time- and condition-based triggers on a fixed cadence and
//! dispatches matching actions without blocking the evaluation loop:
//!
//! - **Time triggers**: a callback computes today's target instant fresh on
//!   every tick, so providers whose answer shifts daily (sunrise, sunset)
//!   stay current
//! - **Date filters**: secondary gating conditions combined with AND/OR logic
//! - **Once-per-day firing**: a schedule that fired stays quiet until the
//!   local calendar day changes
//! - **Fire-and-forget dispatch**: actions run as detached tasks; a stuck
//!   action cannot delay other schedules or future ticks
//!
//! # Example
//!
//! ```ignore
//! use casa_core::scheduler::{Schedule, Scheduler, Trigger};
//!
//! let scheduler = Scheduler::new();
//! let schedule = Schedule::new(
//!     "Night Lights ON",
//!     Trigger::time(move || sun.sunset_today().expect("no sunset for today")),
//!     Arc::new(|_token| Box::pin(async { /* switch the relay */ })),
//! );
//! scheduler.add_schedule(schedule).await;
//!
//! scheduler.start().await?;
//! // ...
//! scheduler.stop().await;
//! ```

mod clock;
mod engine;
mod triggers;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Scheduler, SchedulerConfig};
pub use triggers::{Comparator, DateFilter, Filter, TimeFn, TimeTrigger, Trigger};
pub use types::{
    Action, ActionFuture, CancellationToken, FilterLogic, Result as SchedulerResult, Schedule,
    SchedulerError,
};
