//! Weekday and time-of-day primitives.
//!
//! The catalog's wire format uses one-letter weekday codes (`M T W R F`)
//! and `HH:MM` time strings. Both parse into small copy types here; a
//! failed parse indicates bad caller data and surfaces as a typed
//! [`ParseError`] rather than a search outcome.
//!
//! # Time Model
//! All times are minutes since midnight on a five-day teaching week.
//! Ranges are half-open: a meeting ending at 10:00 does not overlap one
//! starting at 10:00.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parse failure for weekday codes and `HH:MM` time strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The day code is not one of `M`, `T`, `W`, `R`, `F`.
    #[error("unsupported day code: {0}")]
    InvalidDayCode(String),
    /// The time string is not a well-formed `HH:MM` time of day.
    #[error("malformed time of day: {0}")]
    InvalidTimeOfDay(String),
}

/// A teaching weekday.
///
/// Weekend days are not part of the model; the catalog never schedules
/// them. `R` is the conventional registrar code for Thursday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "M")]
    Mon,
    #[serde(rename = "T")]
    Tue,
    #[serde(rename = "W")]
    Wed,
    #[serde(rename = "R")]
    Thu,
    #[serde(rename = "F")]
    Fri,
}

impl Day {
    /// All teaching days, Monday first.
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Weekday index, Monday = 0 .. Friday = 4.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Day::Mon => 0,
            Day::Tue => 1,
            Day::Wed => 2,
            Day::Thu => 3,
            Day::Fri => 4,
        }
    }

    /// One-letter registrar code.
    pub fn code(self) -> &'static str {
        match self {
            Day::Mon => "M",
            Day::Tue => "T",
            Day::Wed => "W",
            Day::Thu => "R",
            Day::Fri => "F",
        }
    }

    /// Full English weekday name (used in conflict messages).
    pub fn full_name(self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Day {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Day::Mon),
            "T" => Ok(Day::Tue),
            "W" => Ok(Day::Wed),
            "R" => Ok(Day::Thu),
            "F" => Ok(Day::Fri),
            other => Err(ParseError::InvalidDayCode(other.to_string())),
        }
    }
}

/// A time of day, stored as minutes since midnight.
///
/// Parses from and renders to the zero-padded `HH:MM` wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time of day from an hour and minute.
    ///
    /// Panics on out-of-range components; use the `FromStr` impl for
    /// untrusted input.
    pub fn from_hm(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "invalid time components");
        Self(hour * 60 + minute)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0..24).
    #[inline]
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0..60).
    #[inline]
    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::InvalidTimeOfDay(s.to_string());
        let (hh, mm) = s.split_once(':').ok_or_else(bad)?;
        if hh.is_empty() || mm.len() != 2 {
            return Err(bad());
        }
        let hour: u16 = hh.parse().map_err(|_| bad())?;
        let minute: u16 = mm.parse().map_err(|_| bad())?;
        if hour > 23 || minute > 59 {
            return Err(bad());
        }
        Ok(Self(hour * 60 + minute))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// A half-open minute interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (inclusive).
    pub start: TimeOfDay,
    /// Interval end (exclusive).
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Creates a new range.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Duration in minutes. Zero for degenerate ranges.
    #[inline]
    pub fn duration_mins(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether a time falls within this range.
    #[inline]
    pub fn contains(&self, t: TimeOfDay) -> bool {
        t >= self.start && t < self.end
    }

    /// Strict half-open overlap test.
    ///
    /// Touching ranges (one ends where the other starts) do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
