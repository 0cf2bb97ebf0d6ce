mod telemetry;

use chrono::NaiveTime;
use phrase_reminders_api::{
    execute, AddCustomSlotUseCase, EditSlotTimeUseCase, LoadSlotsUseCase, ReconcileRemindersUseCase,
    ReconcileReport, ReconcileTrigger, ReminderError, RemoveCustomSlotUseCase, SetLanguageUseCase,
    SlotsResponse, ToggleSlotUseCase,
};
use phrase_reminders_domain::{ForegroundPresentation, MalformedTimeError, Notice, ReminderTime};
use phrase_reminders_infra::ReminderContext;
pub use telemetry::{get_subscriber, init_subscriber};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Entry point of the host app into the reminder scheduler.
///
/// Every operation loads the full slot list, changes it and saves it again, so
/// operations are serialized and never interleave.
pub struct Application {
    context: ReminderContext,
    operation_lock: Mutex<()>,
}

impl Application {
    /// Registers how reminders are presented while the app is in the foreground,
    /// loads the slots and reconciles them with the notification backend.
    /// A host creates one `Application` per process.
    pub async fn new(context: ReminderContext) -> Result<Self, ReminderError> {
        context
            .notification_backend
            .set_foreground_presentation(ForegroundPresentation::default());

        let app = Self {
            context,
            operation_lock: Mutex::new(()),
        };
        let slots = execute(LoadSlotsUseCase {}, &app.context).await?;
        info!("Loaded {} reminder slots", slots.slots.len());

        app.reconcile(ReconcileTrigger::ColdStart).await?;
        Ok(app)
    }

    pub fn context(&self) -> &ReminderContext {
        &self.context
    }

    async fn reconcile(&self, trigger: ReconcileTrigger) -> Result<ReconcileReport, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(ReconcileRemindersUseCase { trigger }, &self.context).await
    }

    pub async fn slots(&self) -> Result<SlotsResponse, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(LoadSlotsUseCase {}, &self.context).await
    }

    /// The app has regained focus
    pub async fn on_focus(&self) -> Result<ReconcileReport, ReminderError> {
        self.reconcile(ReconcileTrigger::Focused).await
    }

    pub async fn set_language(&self, language_id: &str) -> Result<ReconcileReport, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        let usecase = SetLanguageUseCase {
            language_id: language_id.to_string(),
        };
        execute(usecase, &self.context).await
    }

    pub async fn toggle(&self, slot_id: i64) -> Result<SlotsResponse, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(ToggleSlotUseCase { slot_id }, &self.context).await
    }

    pub async fn add_custom(&self, time: NaiveTime) -> Result<SlotsResponse, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(AddCustomSlotUseCase { time }, &self.context).await
    }

    /// Same as `add_custom` for a time entered in the "8:00 AM" form
    pub async fn add_custom_at(&self, display_time: &str) -> Result<SlotsResponse, ReminderError> {
        let time = self.parse_display_time(display_time)?;
        self.add_custom(time).await
    }

    pub async fn edit_time(
        &self,
        slot_id: i64,
        time: NaiveTime,
    ) -> Result<SlotsResponse, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(EditSlotTimeUseCase { slot_id, time }, &self.context).await
    }

    pub async fn remove_custom(&self, slot_id: i64) -> Result<SlotsResponse, ReminderError> {
        let _guard = self.operation_lock.lock().await;
        execute(RemoveCustomSlotUseCase { slot_id }, &self.context).await
    }

    fn parse_display_time(&self, display_time: &str) -> Result<NaiveTime, ReminderError> {
        let parsed = ReminderTime::parse(display_time).map(|t| {
            let clock = t.clock();
            NaiveTime::from_hms_opt(clock.hour, clock.minute, 0)
        });
        match parsed {
            Ok(Some(time)) => Ok(time),
            Ok(None) => Err(self.reject_time(
                MalformedTimeError(display_time.to_string()).into(),
            )),
            Err(e) => Err(self.reject_time(e.into())),
        }
    }

    fn reject_time(&self, e: ReminderError) -> ReminderError {
        error!("Rejected reminder time. Err: {:?}", e);
        self.context.notice_sink.publish(&Notice::Error(e.to_string()));
        e
    }
}
