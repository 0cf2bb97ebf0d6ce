mod error;
mod language;
mod reconcile;
mod shared;
mod slot;

pub use error::ReminderError;
pub use language::SetLanguageUseCase;
pub use reconcile::{
    ReconcileFailure, ReconcileRemindersUseCase, ReconcileReport, ReconcileTrigger,
};
pub use shared::{
    slots::SlotsResponse,
    usecase::{execute, UseCase},
};
pub use slot::{
    AddCustomSlotUseCase, EditSlotTimeUseCase, LoadSlotsUseCase, RemoveCustomSlotUseCase,
    ToggleSlotUseCase,
};
