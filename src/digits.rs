//! Digit formatting for flip countdowns.
//!
//! Remaining time is encoded as a fixed-width string of eight decimal digits,
//! two per unit, least significant unit first:
//!
//! | index | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |-------|---|---|---|---|---|---|---|---|
//! | unit  | sec | sec | min | min | hour | hour | day | day |
//!
//! Each card of a countdown is bound to one index, so diffing two digit
//! strings position by position tells which cards need to flip.
//!
//! ```rust
//! use flip_countdown::digits::format_remaining;
//!
//! let digits = format_remaining(61_000);
//! assert_eq!(digits.as_str(), "01010000");
//! assert_eq!(digits.minutes(), 1);
//! ```

use std::fmt;

/// Number of digit positions in a [`DigitString`].
pub const DIGIT_COUNT: usize = 8;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

/// Positional encoding of a remaining time.
///
/// Values are never clamped to their unit range. A remaining time of 100 days
/// or more produces a string longer than [`DIGIT_COUNT`]; callers are expected
/// to keep inputs below that horizon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitString(String);

impl DigitString {
    /// Returns the digit at `index`, if any.
    pub fn digit(&self, index: usize) -> Option<char> {
        self.0.as_bytes().get(index).map(|b| *b as char)
    }

    /// The raw digits, seconds first.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Seconds component (0..60).
    pub fn seconds(&self) -> u64 {
        self.pair(0)
    }

    /// Minutes component (0..60).
    pub fn minutes(&self) -> u64 {
        self.pair(2)
    }

    /// Hours component (0..24).
    pub fn hours(&self) -> u64 {
        self.pair(4)
    }

    /// Days component.
    pub fn days(&self) -> u64 {
        self.0
            .get(6..)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Whole seconds represented by the four units.
    pub fn total_seconds(&self) -> u64 {
        self.days() * SECS_PER_DAY
            + self.hours() * SECS_PER_HOUR
            + self.minutes() * SECS_PER_MINUTE
            + self.seconds()
    }

    /// Positions whose digit differs from `other`, in ascending order.
    pub fn changes<'a>(&'a self, other: &'a DigitString) -> impl Iterator<Item = usize> + 'a {
        (0..DIGIT_COUNT).filter(move |&i| self.digit(i) != other.digit(i))
    }

    fn pair(&self, start: usize) -> u64 {
        self.0
            .get(start..start + 2)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DigitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Formats a remaining time in milliseconds as a [`DigitString`].
///
/// Sub-second remainders are floored, so `999` formats the same as `0`.
pub fn format_remaining(millis: u64) -> DigitString {
    let total = millis / 1000;
    let seconds = total % SECS_PER_MINUTE;
    let minutes = (total / SECS_PER_MINUTE) % 60;
    let hours = (total / SECS_PER_HOUR) % 24;
    let days = total / SECS_PER_DAY;

    DigitString(format!(
        "{:02}{:02}{:02}{:02}",
        seconds, minutes, hours, days
    ))
}
