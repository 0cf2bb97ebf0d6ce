use crate::{
    error::ReminderError,
    shared::{
        slots::{is_limit_reached, save_slots, SlotsResponse},
        usecase::UseCase,
    },
};
use phrase_reminders_domain::{dedup_slots, ReminderSlot};
use phrase_reminders_infra::ReminderContext;
use tracing::{error, info, warn};

/// Loads the `ReminderSlot`s and seeds the defaults on the first launch
#[derive(Debug)]
pub struct LoadSlotsUseCase {}

#[async_trait::async_trait(?Send)]
impl UseCase for LoadSlotsUseCase {
    type Response = SlotsResponse;

    type Error = ReminderError;

    const NAME: &'static str = "LoadSlots";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let stored = ctx.repos.reminder_slot_repo.load().await.map_err(|e| {
            error!("Unable to load reminder slots. Err: {:?}", e);
            ReminderError::persistence(e)
        })?;

        let slots = match stored {
            Some(mut slots) => {
                let removed = dedup_slots(&mut slots);
                if !removed.is_empty() {
                    warn!("Dropped reminder slots with duplicated ids: {:?}", removed);
                    save_slots(ctx, &slots).await?;
                }
                slots
            }
            None => {
                info!("No reminder slots saved yet, seeding the defaults");
                let slots = ReminderSlot::defaults();
                save_slots(ctx, &slots).await?;
                slots
            }
        };

        Ok(SlotsResponse {
            is_limit_reached: is_limit_reached(ctx).await,
            slots,
            notices: vec![],
        })
    }
}
