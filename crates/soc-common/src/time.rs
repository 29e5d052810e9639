//! Observation dates and imagery compositing windows.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Nominal calendar date of an estimate (UTC, no time of day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationDate(NaiveDate);

impl ObservationDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day; `None` for an impossible date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse an ISO 8601 date.
    ///
    /// Accepts `YYYY-MM-DD`, or a full datetime whose date part is kept.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.date_naive()));
        }

        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(ndt.date()));
        }

        Err(TimeParseError::InvalidFormat(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The ±`half_width_days` compositing window centred on this date.
    pub fn window(&self, half_width_days: i64) -> CompositingWindow {
        CompositingWindow::around(*self, half_width_days)
    }
}

impl std::fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Half-open date range `[start, end)` merged into one composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CompositingWindow {
    pub fn around(center: ObservationDate, half_width_days: i64) -> Self {
        let half = Duration::days(half_width_days);
        Self {
            start: center.0 - half,
            end: center.0 + half,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl std::fmt::Display for CompositingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidFormat(String),
}

impl From<TimeParseError> for crate::error::SocError {
    fn from(err: TimeParseError) -> Self {
        crate::error::SocError::InvalidConfiguration(err.to_string())
    }
}
