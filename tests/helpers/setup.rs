use chrono_tz::Tz;
use phrase_reminders::Application;
use phrase_reminders_infra::{
    ISys, InMemoryKVRepo, InMemoryNoticeSink, InMemoryNotificationBackend, ReminderContext, Repos,
};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

/// Sat Feb 20 2021 23:00:00 UTC
pub const START_MILLIS: i64 = 1613862000000;
pub const HOUR_MILLIS: i64 = 1000 * 60 * 60;
pub const DAY_MILLIS: i64 = 24 * HOUR_MILLIS;

pub struct TestClock {
    millis: AtomicI64,
    timezone: Mutex<Tz>,
}

impl TestClock {
    pub fn advance_millis(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set_timezone(&self, timezone: Tz) {
        *self.timezone.lock().unwrap() = timezone;
    }
}

impl ISys for TestClock {
    fn get_timestamp_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn get_timezone(&self) -> Tz {
        *self.timezone.lock().unwrap()
    }
}

pub struct TestApp {
    pub backend: Arc<InMemoryNotificationBackend>,
    pub kv: Arc<InMemoryKVRepo>,
    pub notices: Arc<InMemoryNoticeSink>,
    pub clock: Arc<TestClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryNotificationBackend::new(64)),
            kv: Arc::new(InMemoryKVRepo::new()),
            notices: Arc::new(InMemoryNoticeSink::new()),
            clock: Arc::new(TestClock {
                millis: AtomicI64::new(START_MILLIS),
                timezone: Mutex::new(chrono_tz::UTC),
            }),
        }
    }

    pub fn context(&self) -> ReminderContext {
        let mut ctx = ReminderContext::create_inmemory();
        ctx.config.days_to_schedule = 7;
        ctx.config.capacity_ceiling = 49;
        ctx.config.platform_limit = 64;
        ctx.config.renewal_threshold = 2;
        ctx.repos = Repos::create(self.kv.clone());
        ctx.notification_backend = self.backend.clone();
        ctx.notice_sink = self.notices.clone();
        ctx.sys = self.clock.clone();
        ctx
    }

    /// Starts the application like a fresh process would, on top of the
    /// storage and notification backend of this test app
    pub async fn launch(&self) -> Application {
        Application::new(self.context())
            .await
            .expect("Failed to launch application")
    }

    pub fn entries_of(&self, prefix: &str) -> Vec<String> {
        let mut identifiers = self
            .backend
            .entries()
            .into_iter()
            .map(|e| e.identifier)
            .filter(|id| id.starts_with(&format!("{}-", prefix)))
            .collect::<Vec<_>>();
        identifiers.sort();
        identifiers
    }

    /// Moves the clock forward and lets the device fire the entries that became due
    pub fn advance_and_deliver(&self, millis: i64) -> usize {
        self.clock.advance_millis(millis);
        self.backend.deliver_due(&self.clock.get_local_datetime())
    }
}
