use phrase_reminders_domain::MalformedTimeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error(transparent)]
    MalformedTime(#[from] MalformedTimeError),
    #[error("The notification service is unavailable. Error message: `{0}`")]
    BackendUnavailable(String),
    #[error("You've reached the notification limit of {ceiling} ({scheduled} scheduled). Remove or disable some reminders first.")]
    CapacityExceeded { scheduled: usize, ceiling: usize },
    #[error("The default reminder at {0} cannot be changed or removed")]
    ProtectedSlot(String),
    #[error("Unable to access the saved reminders. Error message: `{0}`")]
    Persistence(String),
    #[error("The reminder with id: {0}, was not found")]
    SlotNotFound(i64),
    #[error("There is already a reminder at {0}")]
    DuplicateTime(String),
}

impl ReminderError {
    pub fn backend(e: anyhow::Error) -> Self {
        Self::BackendUnavailable(format!("{:#}", e))
    }

    pub fn persistence(e: anyhow::Error) -> Self {
        Self::Persistence(format!("{:#}", e))
    }
}
