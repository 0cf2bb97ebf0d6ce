use chrono_tz::Tz;
use phrase_reminders_domain::{belongs_to, ReminderSlot};
use phrase_reminders_infra::{
    ISys, InMemoryKVRepo, InMemoryNoticeSink, InMemoryNotificationBackend, ReminderContext, Repos,
};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

/// Sat Feb 20 2021 23:00:00 UTC
pub const START_MILLIS: i64 = 1613862000000;
pub const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

pub struct TestSys {
    millis: AtomicI64,
}

impl TestSys {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn advance_millis(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn get_timezone(&self) -> Tz {
        chrono_tz::UTC
    }
}

pub struct TestContext {
    pub ctx: ReminderContext,
    pub backend: Arc<InMemoryNotificationBackend>,
    pub kv: Arc<InMemoryKVRepo>,
    pub notices: Arc<InMemoryNoticeSink>,
    pub sys: Arc<TestSys>,
}

pub fn setup() -> TestContext {
    let mut ctx = ReminderContext::create_inmemory();
    ctx.config.days_to_schedule = 7;
    ctx.config.capacity_ceiling = 49;
    ctx.config.platform_limit = 64;
    ctx.config.renewal_threshold = 2;

    let backend = Arc::new(InMemoryNotificationBackend::new(64));
    let kv = Arc::new(InMemoryKVRepo::new());
    let notices = Arc::new(InMemoryNoticeSink::new());
    let sys = Arc::new(TestSys::new(START_MILLIS));

    ctx.notification_backend = backend.clone();
    ctx.repos = Repos::create(kv.clone());
    ctx.notice_sink = notices.clone();
    ctx.sys = sys.clone();

    TestContext {
        ctx,
        backend,
        kv,
        notices,
        sys,
    }
}

pub async fn saved_slots(ctx: &ReminderContext) -> Option<Vec<ReminderSlot>> {
    ctx.repos.reminder_slot_repo.load().await.unwrap()
}

pub fn count_entries(backend: &InMemoryNotificationBackend, prefix: &str) -> usize {
    backend
        .entries()
        .iter()
        .filter(|e| belongs_to(&e.identifier, prefix))
        .count()
}
