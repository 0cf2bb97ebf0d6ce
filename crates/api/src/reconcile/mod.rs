mod reconcile_reminders;

pub use reconcile_reminders::{
    ReconcileFailure, ReconcileRemindersUseCase, ReconcileReport, ReconcileTrigger,
};
