use crate::time::ClockTime;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// When a `ScheduledNotification` fires. Calendar fields are local time
/// on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationTrigger {
    Calendar {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
    Daily {
        hour: u32,
        minute: u32,
        repeats: bool,
    },
}

impl NotificationTrigger {
    pub fn on_date(date: NaiveDate, time: ClockTime) -> Self {
        use chrono::Datelike;

        Self::Calendar {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: time.hour,
            minute: time.minute,
        }
    }

    /// Local datetime at which a calendar trigger fires.
    /// Repeating triggers have no single fire time.
    pub fn fires_at(&self) -> Option<NaiveDateTime> {
        match *self {
            Self::Calendar {
                year,
                month,
                day,
                hour,
                minute,
            } => NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0),
            Self::Daily { .. } => None,
        }
    }

    /// Whether the trigger is still going to fire after `now` (local time)
    pub fn is_pending(&self, now: &NaiveDateTime) -> bool {
        match self {
            Self::Daily { repeats, .. } => *repeats,
            Self::Calendar { .. } => self.fires_at().map(|at| at > *now).unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// An entry owned by the notification backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub identifier: String,
    pub trigger: NotificationTrigger,
    pub content: NotificationContent,
}

/// How notifications are presented while the app is in the foreground.
/// This is configured once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundPresentation {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for ForegroundPresentation {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: false,
            set_badge: false,
        }
    }
}

/// Identifier of the entry scheduled `day_offset` days into the window of `prefix`
pub fn entry_identifier(prefix: &str, day_offset: u32) -> String {
    format!("{}-{}", prefix, day_offset)
}

/// Splits an entry identifier created by `entry_identifier` into its prefix and day offset.
/// Returns `None` for identifiers that were not created by this app.
pub fn parse_entry_identifier(identifier: &str) -> Option<(&str, u32)> {
    let (prefix, offset) = identifier.rsplit_once('-')?;
    ClockTime::from_identifier(prefix)?;
    if offset.is_empty() || !offset.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((prefix, offset.parse().ok()?))
}

/// Whether `identifier` is one of the entries registered under `prefix`
pub fn belongs_to(identifier: &str, prefix: &str) -> bool {
    matches!(parse_entry_identifier(identifier), Some((p, _)) if p == prefix)
}
