mod inmemory;

pub use inmemory::InMemoryNotificationBackend;
use phrase_reminders_domain::{
    ForegroundPresentation, NotificationContent, NotificationTrigger, ScheduledNotification,
};

/// The platform service that schedules and fires local notifications.
///
/// Scheduling with an identifier that is already scheduled replaces that entry.
/// Cancelling an identifier that is not scheduled is not an error.
#[async_trait::async_trait]
pub trait INotificationBackend: Send + Sync {
    async fn schedule(
        &self,
        identifier: &str,
        trigger: &NotificationTrigger,
        content: &NotificationContent,
    ) -> anyhow::Result<String>;
    async fn cancel(&self, identifier: &str) -> anyhow::Result<()>;
    async fn list_all_scheduled(&self) -> anyhow::Result<Vec<ScheduledNotification>>;
    /// Process wide handler configuration, set once at startup
    fn set_foreground_presentation(&self, presentation: ForegroundPresentation);
}
