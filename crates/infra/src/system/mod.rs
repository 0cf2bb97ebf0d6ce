use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
    /// The time zone the device is currently in
    fn get_timezone(&self) -> Tz;

    /// The current wall clock time of the device
    fn get_local_datetime(&self) -> NaiveDateTime {
        let tz = self.get_timezone();
        let millis = self.get_timestamp_millis();
        match Utc.timestamp_millis_opt(millis).single() {
            Some(now) => now.with_timezone(&tz).naive_local(),
            None => Utc::now().with_timezone(&tz).naive_local(),
        }
    }
}

/// System that gets the real time and is used when not testing
pub struct RealSys {
    pub timezone: Tz,
}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn get_timezone(&self) -> Tz {
        self.timezone
    }
}
