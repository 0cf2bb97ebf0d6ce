use crate::{
    error::ReminderError,
    shared::{
        slots::{
            current_language, ensure_time_available, is_limit_reached, load_slots, save_slots,
            SlotsResponse,
        },
        usecase::UseCase,
    },
};
use chrono::NaiveTime;
use phrase_reminders_domain::{next_custom_slot_id, Notice, ReminderSlot, ReminderTime};
use phrase_reminders_infra::ReminderContext;
use tracing::{error, info};

/// Creates a new enabled custom slot and schedules it right away
#[derive(Debug)]
pub struct AddCustomSlotUseCase {
    pub time: NaiveTime,
}

#[async_trait::async_trait(?Send)]
impl UseCase for AddCustomSlotUseCase {
    type Response = SlotsResponse;

    type Error = ReminderError;

    const NAME: &'static str = "AddCustomSlot";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let notifications = ctx.notifications();
        let scheduled = notifications
            .count_all_scheduled()
            .await
            .map_err(ReminderError::backend)?;
        if scheduled >= notifications.capacity_ceiling() {
            info!(
                "Rejected new reminder slot, {} notifications are scheduled",
                scheduled
            );
            return Err(ReminderError::CapacityExceeded {
                scheduled,
                ceiling: notifications.capacity_ceiling(),
            });
        }

        let mut slots = load_slots(ctx).await?;
        let display_time = ReminderTime::from_naive_time(&self.time);
        ensure_time_available(&slots, &display_time, None)?;

        let id = next_custom_slot_id(ctx.sys.get_timestamp_millis(), &slots);
        let mut slot = ReminderSlot::new_custom(id, display_time);

        let language = current_language(ctx).await;
        let backend_ref = notifications
            .schedule_recurring(&slot, language.as_deref())
            .await
            .map_err(|e| {
                error!("Unable to schedule reminders of new slot {}. Err: {:?}", id, e);
                ReminderError::backend(e)
            })?;
        slot.notification_backend_ref = Some(backend_ref);

        let notice = Notice::scheduled(&slot);
        slots.push(slot);
        save_slots(ctx, &slots).await?;

        Ok(SlotsResponse {
            is_limit_reached: is_limit_reached(ctx).await,
            slots,
            notices: vec![notice],
        })
    }

    fn notices(res: &Self::Response) -> Vec<Notice> {
        res.notices.clone()
    }
}
