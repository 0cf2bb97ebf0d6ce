mod notice;
mod notification;
mod phrase;
mod reminder_slot;
mod time;

pub use notice::Notice;
pub use notification::{
    belongs_to, entry_identifier, parse_entry_identifier, ForegroundPresentation,
    NotificationContent, NotificationTrigger, ScheduledNotification,
};
pub use phrase::{Language, Phrase, PhraseCatalog};
pub use reminder_slot::{dedup_slots, next_custom_slot_id, ReminderSlot};
pub use time::{
    format_display_time, parse_display_time, to_identifier_string, ClockTime,
    MalformedTimeError, ReminderTime,
};
