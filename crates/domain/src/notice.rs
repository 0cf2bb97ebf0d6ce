use crate::reminder_slot::ReminderSlot;
use std::fmt::Display;

/// A transient message for the user about the outcome of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Reminders have been set for a slot
    Scheduled { slot_id: i64, display_time: String },
    /// Reminders of a slot have been cancelled
    Cancelled { slot_id: i64, display_time: String },
    /// The window of a slot was running out and has been refilled
    Renewed { slot_id: i64, display_time: String },
    /// A custom slot has been deleted together with its reminders
    Removed { slot_id: i64, display_time: String },
    Error(String),
}

impl Notice {
    pub fn scheduled(slot: &ReminderSlot) -> Self {
        Self::Scheduled {
            slot_id: slot.id,
            display_time: slot.display_time.display(),
        }
    }

    pub fn cancelled(slot: &ReminderSlot) -> Self {
        Self::Cancelled {
            slot_id: slot.id,
            display_time: slot.display_time.display(),
        }
    }

    pub fn renewed(slot: &ReminderSlot) -> Self {
        Self::Renewed {
            slot_id: slot.id,
            display_time: slot.display_time.display(),
        }
    }

    pub fn removed(slot: &ReminderSlot) -> Self {
        Self::Removed {
            slot_id: slot.id,
            display_time: slot.display_time.display(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled { display_time, .. } => {
                write!(f, "Daily reminder set for {}", display_time)
            }
            Self::Cancelled { display_time, .. } => {
                write!(f, "Reminder for {} turned off", display_time)
            }
            Self::Renewed { display_time, .. } => {
                write!(f, "Reminders for {} have been renewed", display_time)
            }
            Self::Removed { display_time, .. } => {
                write!(f, "Reminder for {} removed", display_time)
            }
            Self::Error(message) => write!(f, "Something went wrong: {}", message),
        }
    }
}
