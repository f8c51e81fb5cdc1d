//! Casa Core - Home Automation Scheduling
//!
//! This crate provides the scheduling logic for the casa home-automation
//! daemon, including:
//! - Scheduler: tick-driven rule evaluation with AND/OR filter logic
//! - Clock: injectable time source for deterministic tests
//! - Sun: sunrise/sunset lookup from a bundled per-day dataset

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod scheduler;
pub mod sun;

pub use scheduler::{Schedule, Scheduler, SchedulerConfig};
pub use sun::{DailyData, SunData, SunError};
