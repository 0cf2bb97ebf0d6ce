use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Time: `{0}` is malformed, expected the format `H:MM AM` or `H:MM PM`")]
pub struct MalformedTimeError(pub String);

/// A time of day on the 24 hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

/// Parses a 12 hour display time like `8:00 AM` into a `ClockTime`.
///
/// The clock portion and the marker are separated by any whitespace (some
/// platforms format with a narrow no-break space). The marker is case insensitive.
pub fn parse_display_time(display: &str) -> Result<ClockTime, MalformedTimeError> {
    let malformed = || MalformedTimeError(display.to_string());

    let mut parts = display.split_whitespace();
    let (clock, marker) = match (parts.next(), parts.next(), parts.next()) {
        (Some(clock), Some(marker), None) => (clock, marker),
        _ => return Err(malformed()),
    };

    let (hour_str, minute_str) = clock.split_once(':').ok_or_else(malformed)?;
    if hour_str.is_empty()
        || hour_str.len() > 2
        || minute_str.len() != 2
        || !hour_str.chars().all(|c| c.is_ascii_digit())
        || !minute_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(malformed());
    }
    let hour: u32 = hour_str.parse().map_err(|_| malformed())?;
    let minute: u32 = minute_str.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(malformed());
    }

    let hour = match marker.to_ascii_uppercase().as_str() {
        "AM" if hour == 12 => 0,
        "AM" => hour,
        "PM" if hour == 12 => 12,
        "PM" => hour + 12,
        _ => return Err(malformed()),
    };

    Ok(ClockTime { hour, minute })
}

/// Formats a 24 hour time as a 12 hour display time, e.g. `20:05` -> `8:05 PM`.
/// Always uses the english markers so that storage does not depend on the device locale.
pub fn format_display_time(hour: u32, minute: u32) -> String {
    let marker = if hour < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour, minute, marker)
}

/// The 24 hour `H:MM` form of a display time, used as the notification identifier prefix
pub fn to_identifier_string(display: &str) -> Result<String, MalformedTimeError> {
    parse_display_time(display).map(|t| t.identifier())
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn identifier(&self) -> String {
        format!("{}:{:02}", self.hour, self.minute)
    }

    /// Inverse of `identifier`
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let (hour, minute) = identifier.split_once(':')?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return None;
        }
        if !hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let time = Self::new(hour.parse().ok()?, minute.parse().ok()?)?;
        // Rejects non canonical forms like `08:00`
        if time.identifier() != identifier {
            return None;
        }
        Some(time)
    }
}

/// Time of day of a `ReminderSlot`.
///
/// The display string is the persisted representation and the 24 hour form is only
/// ever derived from it, so the two encodings can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime(ClockTime);

impl ReminderTime {
    pub fn parse(display: &str) -> Result<Self, MalformedTimeError> {
        parse_display_time(display).map(Self)
    }

    pub fn from_clock(time: ClockTime) -> Self {
        Self(time)
    }

    pub fn from_naive_time(time: &NaiveTime) -> Self {
        Self(ClockTime {
            hour: time.hour(),
            minute: time.minute(),
        })
    }

    pub fn display(&self) -> String {
        format_display_time(self.0.hour, self.0.minute)
    }

    pub fn clock(&self) -> ClockTime {
        self.0
    }

    pub fn identifier(&self) -> String {
        self.0.identifier()
    }
}

impl Display for ReminderTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for ReminderTime {
    type Err = MalformedTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = MalformedTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReminderTime> for String {
    fn from(time: ReminderTime) -> Self {
        time.display()
    }
}
