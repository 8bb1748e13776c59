//! Validation of raw countdown input.
//!
//! Hosts usually collect a duration, a target date and a granularity as
//! strings from a form or a command line. [`CountdownInput::parse`] turns them
//! into a checked configuration for [`crate::countdown::Model::configure`];
//! the countdown itself never re-validates what it is given.
//!
//! ```rust
//! use flip_countdown::countdown::Granularity;
//! use flip_countdown::input::{CountdownInput, InputError};
//! use std::time::{Duration, SystemTime};
//!
//! let now = SystemTime::now();
//! let input = CountdownInput::parse("90000", "", "minute", now).unwrap();
//! assert_eq!(input.duration, Some(Duration::from_secs(90)));
//! assert_eq!(input.granularity, Granularity::Minute);
//!
//! assert!(matches!(
//!     CountdownInput::parse("500", "", "Day", now),
//!     Err(InputError::DurationTooShort(_))
//! ));
//! ```

use crate::countdown::Granularity;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Shortest accepted countdown.
pub const MIN_DURATION: Duration = Duration::from_millis(1000);

/// Local date-time format accepted for targets, e.g. `2025-01-31 18:30:00`.
pub const TARGET_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reasons raw input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The duration is not a whole number of milliseconds.
    #[error("invalid duration {0:?}: expected whole milliseconds")]
    InvalidDuration(String),
    /// The duration is below [`MIN_DURATION`].
    #[error("duration of {0:?} is shorter than one second")]
    DurationTooShort(Duration),
    /// The duration does not fit the chosen granularity.
    #[error("duration of {duration:?} exceeds the {granularity} horizon of {horizon:?}")]
    DurationTooLong {
        /// Requested duration.
        duration: Duration,
        /// Chosen granularity.
        granularity: Granularity,
        /// Exclusive limit for that granularity.
        horizon: Duration,
    },
    /// The target could not be parsed as a date-time.
    #[error("invalid target date {0:?}: expected YYYY-MM-DD HH:MM:SS or RFC 3339")]
    InvalidTargetDate(String),
    /// The target is not in the future.
    #[error("target date is not in the future")]
    TargetInPast,
    /// The target is further away than the chosen granularity can show.
    #[error("target date is beyond the {granularity} horizon of {horizon:?}")]
    TargetTooFar {
        /// Chosen granularity.
        granularity: Granularity,
        /// Exclusive limit for that granularity.
        horizon: Duration,
    },
    /// The granularity name is not one of Day, Hour, Minute or Second.
    #[error("unknown granularity {0:?}: expected Day, Hour, Minute or Second")]
    UnknownGranularity(String),
}

/// A validated countdown configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownInput {
    /// Countdown length, measured from the moment of configuration.
    pub duration: Option<Duration>,
    /// Absolute end moment. Takes precedence over `duration`.
    pub target: Option<SystemTime>,
    /// Units to render.
    pub granularity: Granularity,
}

impl CountdownInput {
    /// A countdown of `duration` shown at `granularity`.
    pub fn from_duration(duration: Duration, granularity: Granularity) -> Self {
        Self {
            duration: Some(duration),
            target: None,
            granularity,
        }
    }

    /// A countdown to `target` shown at `granularity`.
    pub fn from_target(target: SystemTime, granularity: Granularity) -> Self {
        Self {
            duration: None,
            target: Some(target),
            granularity,
        }
    }

    /// Parses and validates raw strings. Blank duration or target means absent;
    /// a blank granularity means [`Granularity::Day`].
    pub fn parse(
        duration: &str,
        target: &str,
        granularity: &str,
        now: SystemTime,
    ) -> Result<Self, InputError> {
        let granularity = if granularity.trim().is_empty() {
            Granularity::default()
        } else {
            granularity.parse()?
        };
        let input = Self {
            duration: parse_duration(duration)?,
            target: parse_target(target)?,
            granularity,
        };
        input.validate(now)?;
        Ok(input)
    }

    /// Checks ranges relative to `now`.
    ///
    /// A target is checked on its own; a duration is only checked when there
    /// is no target, since the target wins.
    pub fn validate(&self, now: SystemTime) -> Result<(), InputError> {
        let horizon = self.granularity.horizon();

        if let Some(target) = self.target {
            let ahead = target
                .duration_since(now)
                .map_err(|_| InputError::TargetInPast)?;
            if ahead.is_zero() {
                return Err(InputError::TargetInPast);
            }
            if ahead >= horizon {
                return Err(InputError::TargetTooFar {
                    granularity: self.granularity,
                    horizon,
                });
            }
            return Ok(());
        }

        if let Some(duration) = self.duration {
            if duration < MIN_DURATION {
                return Err(InputError::DurationTooShort(duration));
            }
            if duration >= horizon {
                return Err(InputError::DurationTooLong {
                    duration,
                    granularity: self.granularity,
                    horizon,
                });
            }
        }

        Ok(())
    }
}

fn parse_duration(raw: &str) -> Result<Option<Duration>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| InputError::InvalidDuration(raw.to_string()))
}

fn parse_target(raw: &str) -> Result<Option<SystemTime>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.into()));
    }
    let naive = NaiveDateTime::parse_from_str(raw, TARGET_FORMAT)
        .map_err(|_| InputError::InvalidTargetDate(raw.to_string()))?;
    // Skipped local times (DST gaps) do not exist; ambiguous ones take the
    // earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| Some(dt.into()))
        .ok_or_else(|| InputError::InvalidTargetDate(raw.to_string()))
}
