//! Sunrise/sunset lookup from a static per-day dataset
//!
//! The dataset covers one reference year; lookups match by month and day so
//! a single file answers queries for any year. Wall-clock strings like
//! `"9:25:22 AM"` are parsed onto the queried calendar day in local time.
//!
//! A missing or unreadable dataset, or a day with no record, is a
//! configuration error the caller must treat as fatal: an automation firing
//! at a silently defaulted time is worse than one that refuses to start.

use std::path::Path;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Result type for sun data operations
pub type Result<T> = std::result::Result<T, SunError>;

/// Sun dataset error types
#[derive(Debug, thiserror::Error)]
pub enum SunError {
    /// Dataset file could not be read
    #[error("failed to read sun data: {0}")]
    Io(#[from] std::io::Error),
    /// Dataset file could not be parsed
    #[error("failed to parse sun data: {0}")]
    Parse(#[from] serde_json::Error),
    /// No record matches the requested month and day
    #[error("no sun data found for {0}")]
    NoDataForDate(NaiveDate),
    /// A record holds a malformed time string
    #[error("invalid time string {value:?} in record for {date}: {source}")]
    InvalidTime {
        /// Date of the offending record
        date: String,
        /// The unparseable time string
        value: String,
        /// Underlying parse failure
        #[source]
        source: chrono::ParseError,
    },
    /// The parsed wall-clock time does not exist in the local timezone
    #[error("time {0} does not exist in the local timezone")]
    NonLocalTime(NaiveDateTime),
}

/// Sun dataset: one record per calendar day of a reference year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunData {
    /// Daily records, in dataset order
    pub results: Vec<DailyData>,
}

/// Sun data for a single day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyData {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Sunrise wall-clock time, e.g. `9:25:22 AM`
    pub sunrise: String,
    /// Sunset wall-clock time
    pub sunset: String,
    /// Start of astronomical twilight; absent in high-latitude summer
    pub first_light: Option<String>,
    /// End of astronomical twilight; absent in high-latitude summer
    pub last_light: Option<String>,
    /// Start of civil twilight
    pub dawn: String,
    /// End of civil twilight
    pub dusk: String,
    /// Solar noon
    pub solar_noon: String,
    /// Start of the evening golden hour; absent in deep winter
    pub golden_hour: Option<String>,
    /// Time between sunrise and sunset, `H:MM:SS`
    pub day_length: String,
    /// IANA timezone the time strings are expressed in
    pub timezone: String,
    /// UTC offset of the time strings, in minutes
    pub utc_offset: i32,
}

impl SunData {
    /// Load sun data from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Records for a date or inclusive date range, matched by month and day.
    ///
    /// The year is ignored on both sides of the comparison. Records whose
    /// date string does not parse are skipped.
    pub fn daily_data(&self, start: NaiveDate, end: Option<NaiveDate>) -> Vec<&DailyData> {
        let start_key = (start.month(), start.day());
        let end_key = end.map_or(start_key, |date| (date.month(), date.day()));

        self.results
            .iter()
            .filter(|daily| {
                NaiveDate::parse_from_str(&daily.date, "%Y-%m-%d")
                    .map(|date| {
                        let key = (date.month(), date.day());
                        key >= start_key && key <= end_key
                    })
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Sunrise instant on `date`'s calendar day
    pub fn sunrise_on(&self, date: NaiveDate) -> Result<DateTime<Local>> {
        let record = self.record_for(date)?;
        parse_local(date, &record.date, &record.sunrise)
    }

    /// Sunset instant on `date`'s calendar day
    pub fn sunset_on(&self, date: NaiveDate) -> Result<DateTime<Local>> {
        let record = self.record_for(date)?;
        parse_local(date, &record.date, &record.sunset)
    }

    /// Sunrise instant for the current local day
    pub fn sunrise_today(&self) -> Result<DateTime<Local>> {
        self.sunrise_on(Local::now().date_naive())
    }

    /// Sunset instant for the current local day
    pub fn sunset_today(&self) -> Result<DateTime<Local>> {
        self.sunset_on(Local::now().date_naive())
    }

    fn record_for(&self, date: NaiveDate) -> Result<&DailyData> {
        self.daily_data(date, None)
            .into_iter()
            .next()
            .ok_or(SunError::NoDataForDate(date))
    }
}

/// Parse a dataset wall-clock string onto `date` in local time
fn parse_local(date: NaiveDate, record_date: &str, value: &str) -> Result<DateTime<Local>> {
    let time = NaiveTime::parse_from_str(value, "%I:%M:%S %p").map_err(|source| {
        SunError::InvalidTime {
            date: record_date.to_string(),
            value: value.to_string(),
            source,
        }
    })?;
    let naive = date.and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or(SunError::NonLocalTime(naive))
}
