use crate::{
    error::ReminderError,
    shared::{
        slots::{
            current_language, ensure_time_available, find_slot_index, is_limit_reached,
            live_backend_ref, load_slots, save_slots, SlotsResponse,
        },
        usecase::UseCase,
    },
};
use chrono::NaiveTime;
use phrase_reminders_domain::{Notice, ReminderTime};
use phrase_reminders_infra::ReminderContext;
use tracing::error;

/// Moves a custom slot to another time. The slot keeps its id and an enabled
/// slot gets its entries moved to the new time.
#[derive(Debug)]
pub struct EditSlotTimeUseCase {
    pub slot_id: i64,
    pub time: NaiveTime,
}

#[async_trait::async_trait(?Send)]
impl UseCase for EditSlotTimeUseCase {
    type Response = SlotsResponse;

    type Error = ReminderError;

    const NAME: &'static str = "EditSlotTime";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let mut slots = load_slots(ctx).await?;
        let index = find_slot_index(&slots, self.slot_id)?;
        if !slots[index].is_custom {
            return Err(ReminderError::ProtectedSlot(
                slots[index].display_time.display(),
            ));
        }
        let display_time = ReminderTime::from_naive_time(&self.time);
        ensure_time_available(&slots, &display_time, Some(self.slot_id))?;

        let mut slot = slots[index].clone();
        let mut notices = vec![];
        if slot.is_enabled {
            let notifications = ctx.notifications();
            notifications
                .cancel_all(live_backend_ref(&slot).as_deref())
                .await
                .map_err(|e| {
                    error!("Unable to cancel reminders of slot {}. Err: {:?}", slot.id, e);
                    ReminderError::backend(e)
                })?;

            slot.display_time = display_time;
            let language = current_language(ctx).await;
            let backend_ref = notifications
                .schedule_recurring(&slot, language.as_deref())
                .await
                .map_err(|e| {
                    error!("Unable to reschedule reminders of slot {}. Err: {:?}", slot.id, e);
                    ReminderError::backend(e)
                })?;
            slot.notification_backend_ref = Some(backend_ref);
            notices.push(Notice::scheduled(&slot));
        } else {
            slot.display_time = display_time;
        }

        slots[index] = slot;
        save_slots(ctx, &slots).await?;

        Ok(SlotsResponse {
            is_limit_reached: is_limit_reached(ctx).await,
            slots,
            notices,
        })
    }

    fn notices(res: &Self::Response) -> Vec<Notice> {
        res.notices.clone()
    }
}
