//! Schedule triggers and filters - the conditions that fire automation rules
//!
//! A trigger computes the instant a schedule should fire today; filters are
//! secondary gating conditions evaluated alongside it. The condition
//! evaluation itself lives here as well, as pure functions of "now" and the
//! schedule.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{FilterLogic, Schedule};

/// Zero-argument callback computing today's target fire instant.
///
/// Re-evaluated on every tick, so providers whose answer shifts from day to
/// day (sunrise, sunset) stay current.
pub type TimeFn = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Trigger types for schedules
#[derive(Clone)]
pub enum Trigger {
    /// Fire at a time of day computed fresh on each evaluation
    Time(TimeTrigger),
}

impl Trigger {
    /// Create a time trigger from a callback returning today's fire instant
    pub fn time(time: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        Self::Time(TimeTrigger {
            time: Arc::new(time),
        })
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Time(_) => f.write_str("Time"),
        }
    }
}

/// Time-of-day trigger
#[derive(Clone)]
pub struct TimeTrigger {
    /// Computes today's target instant
    pub time: TimeFn,
}

/// Filter types for schedules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Compare the evaluation instant against a reference date
    Date(DateFilter),
}

impl Filter {
    /// Create a date filter
    pub fn date(date: DateTime<Local>, comparator: Comparator) -> Self {
        Self::Date(DateFilter { date, comparator })
    }

    /// Whether this filter passes at `now`
    pub fn passes(&self, now: DateTime<Local>) -> bool {
        match self {
            Filter::Date(filter) => filter.comparator.check(now, filter.date),
        }
    }
}

/// Date comparison filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateFilter {
    /// Reference instant
    pub date: DateTime<Local>,
    /// Comparison applied against the evaluation instant
    pub comparator: Comparator,
}

/// Comparison operators for date filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Evaluation instant is strictly before the reference instant
    LessThan,
    /// Evaluation instant is strictly after the reference instant
    GreaterThan,
    /// Evaluation instant falls on the same calendar date, time ignored
    Equal,
    /// Catch-all for comparators this build does not recognize
    Unknown,
}

impl<'de> Deserialize<'de> for Comparator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Unrecognized names map to Unknown rather than failing the whole
        // filter definition.
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "less_than" => Comparator::LessThan,
            "greater_than" => Comparator::GreaterThan,
            "equal" => Comparator::Equal,
            _ => Comparator::Unknown,
        })
    }
}

impl Comparator {
    /// Check `now` against the reference `date`
    pub fn check(&self, now: DateTime<Local>, date: DateTime<Local>) -> bool {
        match self {
            Comparator::LessThan => now < date,
            Comparator::GreaterThan => now > date,
            Comparator::Equal => {
                now.year() == date.year() && now.month() == date.month() && now.day() == date.day()
            }
            // Unrecognized comparators pass instead of gating the schedule
            // off. Surprising for a gating condition; kept pending a product
            // decision on fail-closed semantics.
            Comparator::Unknown => {
                warn!(reference = %date, "unknown comparator in date filter, treating as pass");
                true
            }
        }
    }
}

impl Schedule {
    /// Whether the trigger threshold has been crossed and not yet acted on
    /// today.
    ///
    /// Comparison is by hour and minute only, so the schedule fires on the
    /// first tick at or after the target minute; the coarse polling cadence
    /// cannot make it miss. Once fired, the schedule stays quiet until the
    /// local calendar day changes, even if the computed target moves.
    pub fn should_fire(&self, now: DateTime<Local>) -> bool {
        match &self.trigger {
            Trigger::Time(trigger) => {
                let target = (trigger.time)();
                !self.fired_today(now)
                    && (now.hour() > target.hour()
                        || (now.hour() == target.hour() && now.minute() >= target.minute()))
            }
        }
    }

    fn fired_today(&self, now: DateTime<Local>) -> bool {
        match self.last_triggered() {
            Some(last) => {
                last.year() == now.year() && last.month() == now.month() && last.day() == now.day()
            }
            None => false,
        }
    }

    /// Whether the filter set passes at `now`.
    ///
    /// No filters always passes; OR passes on the first match, AND fails on
    /// the first miss.
    pub fn filters_pass(&self, now: DateTime<Local>) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        match self.filter_logic {
            FilterLogic::Or => self.filters.iter().any(|filter| filter.passes(now)),
            FilterLogic::And => self.filters.iter().all(|filter| filter.passes(now)),
        }
    }
}

#[cfg(test)]
mod tests;
