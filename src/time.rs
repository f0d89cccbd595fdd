//! Timespans and timestamps
//!
//! A [`Timespan`] is a signed count of nanoseconds. A [`Timestamp`] is a UTC instant. The
//! extreme values of both stand for an open range bound.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::TypeAssertionError;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Signed duration with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespan(i64);

impl Timespan {
    pub const MIN: Timespan = Timespan(i64::MIN);
    pub const MAX: Timespan = Timespan(i64::MAX);

    pub const fn from_nanos(nanos: i64) -> Self {
        Timespan(nanos)
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Timespan(seconds.saturating_mul(NANOS_PER_SECOND))
    }

    pub const fn nanos(self) -> i64 {
        self.0
    }

    /// Parse `[-][D-]HH:MM:SS[.fraction]`, `[-]D-HH:MM`, `[-]MM:SS[.fraction]` or
    /// `[-]SS[.fraction]`
    pub fn parse(text: &str) -> Result<Timespan, TypeAssertionError> {
        let invalid = || TypeAssertionError::new("", format!("Unable to parse '{}' as a Timespan", text));

        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (days, clock) = match body.split_once('-') {
            Some((days, clock)) => (Some(days), clock),
            None => (None, body),
        };
        let whole = |field: &str| -> Result<i64, TypeAssertionError> {
            if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            field.parse().map_err(|_| invalid())
        };
        let days_given = days.is_some();
        let days = match days {
            Some(d) => whole(d)?,
            None => 0,
        };

        let fields: Vec<&str> = clock.split(':').collect();
        // Only the seconds field may carry a fraction
        let (hours, minutes, seconds) = match (days_given, fields.as_slice()) {
            (_, [h, m, s]) => (whole(h)?, whole(m)?, Some(*s)),
            (true, [h, m]) => (whole(h)?, whole(m)?, None),
            (false, [m, s]) => (0, whole(m)?, Some(*s)),
            (false, [s]) => (0, 0, Some(*s)),
            _ => return Err(invalid()),
        };
        let (secs, frac_nanos) = match seconds {
            None => (0, 0),
            Some(field) => match field.split_once('.') {
                Some((secs, frac)) => {
                    if frac.len() > 9 {
                        return Err(invalid());
                    }
                    let scale = 10i64.pow(9 - frac.len() as u32);
                    (whole(secs)?, whole(frac)? * scale)
                }
                None => (whole(field)?, 0),
            },
        };

        let nanos = days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|s| s.checked_add(hours.checked_mul(3600)?))
            .and_then(|s| s.checked_add(minutes.checked_mul(60)?))
            .and_then(|s| s.checked_add(secs))
            .and_then(|s| s.checked_mul(NANOS_PER_SECOND))
            .and_then(|n| n.checked_add(frac_nanos))
            .ok_or_else(invalid)?;
        Ok(Timespan(if negative { -nanos } else { nanos }))
    }
}

impl fmt::Display for Timespan {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let nanos_per_second = NANOS_PER_SECOND as u64;
        let total_seconds = magnitude / nanos_per_second;
        let frac = magnitude % nanos_per_second;
        let days = total_seconds / SECONDS_PER_DAY as u64;
        let rest = total_seconds % SECONDS_PER_DAY as u64;

        if self.0 < 0 {
            write!(f, "-")?;
        }
        if days > 0 {
            write!(f, "{}-", days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60)?;
        if frac > 0 {
            let digits = format!("{:09}", frac);
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

/// A UTC instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub const MIN: Timestamp = Timestamp(DateTime::<Utc>::MIN_UTC);
    pub const MAX: Timestamp = Timestamp(DateTime::<Utc>::MAX_UTC);

    pub fn new(instant: DateTime<Utc>) -> Self {
        Timestamp(instant)
    }

    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parse RFC 3339 text. Text without a zone is taken as UTC and a bare date as midnight.
    pub fn parse(text: &str) -> Result<Timestamp, TypeAssertionError> {
        let text = text.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return Ok(Timestamp(instant.with_timezone(&Utc)));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Timestamp(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp(naive.and_utc()))
            .ok_or_else(|| TypeAssertionError::new("", format!("Unable to parse '{}' as a Timestamp", text)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.fZ"))
    }
}
