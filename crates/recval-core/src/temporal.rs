//! # Temporal Types — UTC Timestamps
//!
//! Defines `Timestamp`, the typed value produced when a payload field is
//! declared as a timestamp. Every accepted input form is normalized to UTC.
//!
//! ## Accepted Forms
//!
//! - RFC 3339 with an offset or `Z` (`2024-01-15T08:30:00+02:00`), converted to UTC.
//! - ISO-8601 local date-time without an offset (`2024-01-15T08:30:00`,
//!   optional fractional seconds, `T` or a single space as separator),
//!   interpreted as UTC.
//! - Date only (`2024-01-15`), interpreted as midnight UTC.
//! - Unix epoch seconds via [`Timestamp::from_epoch_secs`].
//!
//! Years are limited to `0000..=9999` on every path, so a timestamp
//! always renders in a form [`Timestamp::parse`] accepts.
//!
//! Sub-second precision is preserved, so rendering a timestamp with
//! [`Timestamp::to_iso8601`] and parsing it again yields the same value.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Local date-time layouts accepted when the input carries no offset.
const NAIVE_LAYOUTS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const MAX_YEAR: i32 = 9999;

/// A UTC timestamp with a four-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse an ISO-8601 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] if the input matches none of
    /// the accepted forms (see module docs).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Self::within_range(dt.with_timezone(&Utc), s);
        }

        for layout in NAIVE_LAYOUTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
                return Self::within_range(naive.and_utc(), s);
            }
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            CoreError::InvalidTimestamp {
                input: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| CoreError::InvalidTimestamp {
            input: s.to_string(),
            reason: "date has no midnight".to_string(),
        })?;
        Self::within_range(midnight.and_utc(), s)
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] if the instant falls outside
    /// years `0000..=9999`.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        let input = secs.to_string();
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| CoreError::InvalidTimestamp {
            input: input.clone(),
            reason: "epoch seconds out of range".to_string(),
        })?;
        Self::within_range(dt, &input)
    }

    fn within_range(dt: DateTime<Utc>, input: &str) -> Result<Self, CoreError> {
        if (0..=MAX_YEAR).contains(&dt.year()) {
            Ok(Self(dt))
        } else {
            Err(CoreError::InvalidTimestamp {
                input: input.to_string(),
                reason: format!("year {} is outside 0000..=9999", dt.year()),
            })
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as RFC 3339 with a `Z` suffix, keeping only the sub-second
    /// digits that are present (e.g. `2024-01-15T08:30:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
