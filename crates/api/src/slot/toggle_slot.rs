use crate::{
    error::ReminderError,
    shared::{
        slots::{
            current_language, find_slot_index, is_limit_reached, live_backend_ref, load_slots,
            save_slots, SlotsResponse,
        },
        usecase::UseCase,
    },
};
use phrase_reminders_domain::Notice;
use phrase_reminders_infra::ReminderContext;
use tracing::error;

/// Turns a slot on or off. Turning on schedules the full window of the slot,
/// turning off cancels every entry of it.
#[derive(Debug)]
pub struct ToggleSlotUseCase {
    pub slot_id: i64,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ToggleSlotUseCase {
    type Response = SlotsResponse;

    type Error = ReminderError;

    const NAME: &'static str = "ToggleSlot";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let mut slots = load_slots(ctx).await?;
        let index = find_slot_index(&slots, self.slot_id)?;
        let notifications = ctx.notifications();

        let mut slot = slots[index].clone();
        let notice = if slot.is_enabled {
            notifications
                .cancel_all(live_backend_ref(&slot).as_deref())
                .await
                .map_err(|e| {
                    error!("Unable to cancel reminders of slot {}. Err: {:?}", slot.id, e);
                    ReminderError::backend(e)
                })?;
            slot.is_enabled = false;
            slot.notification_backend_ref = None;
            Notice::cancelled(&slot)
        } else {
            // Leftovers of an earlier run that never got saved
            notifications
                .cancel_all(slot.notification_backend_ref.as_deref())
                .await
                .map_err(ReminderError::backend)?;
            let language = current_language(ctx).await;
            let backend_ref = notifications
                .schedule_recurring(&slot, language.as_deref())
                .await
                .map_err(|e| {
                    error!("Unable to schedule reminders of slot {}. Err: {:?}", slot.id, e);
                    ReminderError::backend(e)
                })?;
            slot.is_enabled = true;
            slot.notification_backend_ref = Some(backend_ref);
            Notice::scheduled(&slot)
        };

        slots[index] = slot;
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
