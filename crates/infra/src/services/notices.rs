use phrase_reminders_domain::Notice;
use std::sync::Mutex;
use tracing::{info, warn};

/// Presents transient `Notice`s to the user, e.g. as toasts
pub trait INoticeSink: Send + Sync {
    fn publish(&self, notice: &Notice);
}

/// Only logs the notices, used when no presenter has been attached
pub struct LogNoticeSink {}

impl INoticeSink for LogNoticeSink {
    fn publish(&self, notice: &Notice) {
        if notice.is_error() {
            warn!("Notice: {}", notice);
        } else {
            info!("Notice: {}", notice);
        }
    }
}

/// Collects the published notices so that tests can inspect them
pub struct InMemoryNoticeSink {
    notices: Mutex<Vec<Notice>>,
}

impl InMemoryNoticeSink {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(vec![]),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl Default for InMemoryNoticeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl INoticeSink for InMemoryNoticeSink {
    fn publish(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
