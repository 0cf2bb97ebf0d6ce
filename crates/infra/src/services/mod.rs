mod notices;
mod notification_backend;
mod notifications;
mod phrases;

pub use notices::{INoticeSink, InMemoryNoticeSink, LogNoticeSink};
pub use notification_backend::{INotificationBackend, InMemoryNotificationBackend};
pub use notifications::{first_day_of_window, ReminderNotifications};
pub use phrases::{IPhrasePicker, RandomPhrasePicker, REMINDER_TITLE};
