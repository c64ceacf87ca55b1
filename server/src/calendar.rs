//! Calendar day normalization
//!
//! Every timestamp entering the system is reduced to a calendar day
//! (`NaiveDate`) under one fixed reference offset. Days are persisted as
//! `YYYY-MM-DD` text and weekdays are always derived from that value, so
//! writes and reads share a single time base.

use crate::config;
use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// Weekday index of a calendar day, 0 = Sunday through 6 = Saturday
pub fn weekday_of(day: NaiveDate) -> u8 {
    day.weekday().num_days_from_sunday() as u8
}

/// Every day from January 1st of `today`'s year through `today`, inclusive
pub fn dates_from_year_start(today: NaiveDate) -> Vec<NaiveDate> {
    let first = today.with_ordinal(1).unwrap_or(today);

    first.iter_days().take_while(|day| *day <= today).collect()
}

/// Converts instants to calendar days under the system's reference offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Build a calendar for an offset east of UTC, in minutes
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        if minutes.abs() > config::MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::Config(format!(
                "UTC offset of {} minutes is outside +/-{}",
                minutes,
                config::MAX_UTC_OFFSET_MINUTES
            )));
        }

        let offset = FixedOffset::east_opt(minutes * 60)
            .ok_or_else(|| AppError::Config(format!("Invalid UTC offset: {} minutes", minutes)))?;

        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Truncate an instant to its calendar day
    pub fn normalize(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.normalize(Utc::now())
    }

    /// Parse a client-supplied day.
    ///
    /// A bare `YYYY-MM-DD` is already a calendar day and is taken as-is,
    /// as is a date-time without an offset, which is read as local to the
    /// reference offset. An RFC 3339 timestamp is normalized through the
    /// reference offset, so a client sending its local midnight as UTC
    /// lands on the right day when the server is configured with that
    /// client's offset.
    pub fn parse_day(&self, input: &str) -> Result<NaiveDate> {
        let input = input.trim();

        if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(day);
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(local) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(local.date());
            }
        }

        DateTime::parse_from_rfc3339(input)
            .map(|ts| self.normalize(ts.with_timezone(&Utc)))
            .map_err(|_| AppError::validation("date", format!("unparsable date '{}'", input)))
    }
}
