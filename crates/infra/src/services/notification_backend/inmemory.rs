use super::INotificationBackend;
use chrono::NaiveDateTime;
use phrase_reminders_domain::{
    ForegroundPresentation, NotificationContent, NotificationTrigger, ScheduledNotification,
};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

/// Notification backend that keeps its entries in memory. It enforces a hard
/// limit like the platform backends do and is used for testing.
pub struct InMemoryNotificationBackend {
    entries: Mutex<Vec<ScheduledNotification>>,
    hard_limit: usize,
    available: AtomicBool,
    /// Number of schedule calls that succeed before the backend becomes unavailable
    fail_schedule_after: Mutex<Option<usize>>,
    schedule_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    presentation: Mutex<Option<ForegroundPresentation>>,
}

impl InMemoryNotificationBackend {
    pub fn new(hard_limit: usize) -> Self {
        Self {
            entries: Mutex::new(vec![]),
            hard_limit,
            available: AtomicBool::new(true),
            fail_schedule_after: Mutex::new(None),
            schedule_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            presentation: Mutex::new(None),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Lets the next `count` schedule calls succeed and rejects the ones after
    pub fn fail_schedules_after(&self, count: usize) {
        *self.fail_schedule_after.lock().unwrap() = Some(count);
    }

    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<ScheduledNotification> {
        self.entries.lock().unwrap().clone()
    }

    pub fn foreground_presentation(&self) -> Option<ForegroundPresentation> {
        *self.presentation.lock().unwrap()
    }

    /// Simulates the device firing every calendar entry that is due at `now` (local time).
    /// Fired entries are removed like the platform does. Returns the number of fired entries.
    pub fn deliver_due(&self, now: &NaiveDateTime) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.trigger.is_pending(now));
        before - entries.len()
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Notification backend is unavailable"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl INotificationBackend for InMemoryNotificationBackend {
    async fn schedule(
        &self,
        identifier: &str,
        trigger: &NotificationTrigger,
        content: &NotificationContent,
    ) -> anyhow::Result<String> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        {
            let mut fail_after = self.fail_schedule_after.lock().unwrap();
            match *fail_after {
                Some(0) => {
                    return Err(anyhow::Error::msg(
                        "Notification backend rejected the notification",
                    ))
                }
                Some(count) => *fail_after = Some(count - 1),
                None => (),
            }
        }

        let mut entries = self.entries.lock().unwrap();
        let entry = ScheduledNotification {
            identifier: identifier.to_string(),
            trigger: trigger.clone(),
            content: content.clone(),
        };
        match entries.iter().position(|e| e.identifier == identifier) {
            Some(index) => entries[index] = entry,
            None => {
                if entries.len() >= self.hard_limit {
                    return Err(anyhow::anyhow!(
                        "Unable to schedule more than {} notifications",
                        self.hard_limit
                    ));
                }
                entries.push(entry);
            }
        }
        Ok(identifier.to_string())
    }

    async fn cancel(&self, identifier: &str) -> anyhow::Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|e| e.identifier != identifier);
        Ok(())
    }

    async fn list_all_scheduled(&self) -> anyhow::Result<Vec<ScheduledNotification>> {
        self.check_available()?;
        Ok(self.entries())
    }

    fn set_foreground_presentation(&self, presentation: ForegroundPresentation) {
        *self.presentation.lock().unwrap() = Some(presentation);
    }
}
