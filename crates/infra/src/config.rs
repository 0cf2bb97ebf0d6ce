use chrono_tz::Tz;
use std::{path::PathBuf, str::FromStr};
use tracing::warn;

/// Storage key of the list of `ReminderSlot`s
pub const REMINDER_SLOTS_KEY: &str = "notification_preferences";
/// Storage key of the selected language id
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of days ahead that are scheduled as separate notifications for
    /// every enabled slot. Backends are unreliable with daily repeating triggers,
    /// so a rolling window of single fire notifications is used instead.
    pub days_to_schedule: u32,
    /// Soft limit on the total number of scheduled notifications. No new slots
    /// can be created once it is reached.
    pub capacity_ceiling: usize,
    /// Hard limit of the notification backend of the platform
    pub platform_limit: usize,
    /// A slot with fewer pending notifications than this gets its window refilled
    pub renewal_threshold: usize,
    /// Time zone of the device, used when `RealSys` is created
    pub timezone: Tz,
    /// Directory of the file backed key value store
    pub storage_dir: PathBuf,
    /// Json file with the `PhraseCatalog` used for the notification messages
    pub phrase_catalog_path: Option<PathBuf>,
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let days_to_schedule = match parse_env("REMINDERS_DAYS_TO_SCHEDULE", 7u32) {
            0 => {
                warn!("REMINDERS_DAYS_TO_SCHEDULE must be positive, falling back to 7.");
                7
            }
            days => days,
        };
        let platform_limit = parse_env("REMINDERS_PLATFORM_LIMIT", 64usize);
        let capacity_ceiling = parse_env("REMINDERS_CAPACITY_CEILING", 49usize);
        let renewal_threshold = parse_env("REMINDERS_RENEWAL_THRESHOLD", 2usize);
        let timezone = match std::env::var("REMINDERS_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(e) => {
                    warn!(
                        "The given REMINDERS_TIMEZONE: {} is not valid ({:?}), falling back to UTC.",
                        tz, e
                    );
                    chrono_tz::UTC
                }
            },
            Err(_) => chrono_tz::UTC,
        };
        let storage_dir = std::env::var("REMINDERS_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".phrase_reminders"));
        let phrase_catalog_path = std::env::var("REMINDERS_PHRASES_FILE")
            .map(PathBuf::from)
            .ok();

        Self {
            days_to_schedule,
            platform_limit,
            capacity_ceiling: clamp_ceiling(capacity_ceiling, platform_limit),
            renewal_threshold: clamp_renewal_threshold(renewal_threshold, days_to_schedule),
            timezone,
            storage_dir,
            phrase_catalog_path,
        }
    }
}

/// The ceiling has to stay below the platform limit, otherwise the backend
/// starts rejecting notifications before the app notices the limit.
fn clamp_ceiling(ceiling: usize, platform_limit: usize) -> usize {
    let max = platform_limit.saturating_sub(1);
    if ceiling > max {
        warn!(
            "Capacity ceiling: {} is not below the platform limit: {}, using {} instead.",
            ceiling, platform_limit, max
        );
        max
    } else {
        ceiling
    }
}

/// A fresh window has `days_to_schedule` pending notifications. A threshold above
/// that would renew every slot on every reconciliation.
fn clamp_renewal_threshold(threshold: usize, days_to_schedule: u32) -> usize {
    let days = days_to_schedule as usize;
    if (1..=days).contains(&threshold) {
        threshold
    } else {
        let fallback = days.min(2);
        warn!(
            "Renewal threshold: {} must be between 1 and the days to schedule: {}, using {} instead.",
            threshold, days, fallback
        );
        fallback
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
