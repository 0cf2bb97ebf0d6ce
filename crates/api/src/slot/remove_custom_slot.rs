use crate::{
    error::ReminderError,
    shared::{
        slots::{
            find_slot_index, is_limit_reached, live_backend_ref, load_slots, save_slots,
            SlotsResponse,
        },
        usecase::UseCase,
    },
};
use phrase_reminders_domain::Notice;
use phrase_reminders_infra::ReminderContext;
use tracing::error;

/// Deletes a custom slot together with its backend entries
#[derive(Debug)]
pub struct RemoveCustomSlotUseCase {
    pub slot_id: i64,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RemoveCustomSlotUseCase {
    type Response = SlotsResponse;

    type Error = ReminderError;

    const NAME: &'static str = "RemoveCustomSlot";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let mut slots = load_slots(ctx).await?;
        let index = find_slot_index(&slots, self.slot_id)?;
        if !slots[index].is_custom {
            return Err(ReminderError::ProtectedSlot(
                slots[index].display_time.display(),
            ));
        }

        ctx.notifications()
            .cancel_all(live_backend_ref(&slots[index]).as_deref())
            .await
            .map_err(|e| {
                error!(
                    "Unable to cancel reminders of slot {}. Err: {:?}",
                    self.slot_id, e
                );
                ReminderError::backend(e)
            })?;

        let slot = slots.remove(index);
        save_slots(ctx, &slots).await?;

        Ok(SlotsResponse {
            is_limit_reached: is_limit_reached(ctx).await,
            slots,
            notices: vec![Notice::removed(&slot)],
        })
    }

    fn notices(res: &Self::Response) -> Vec<Notice> {
        res.notices.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shared::{
            test_helpers::{saved_slots, setup, START_MILLIS},
            usecase::execute,
        },
        slot::AddCustomSlotUseCase,
    };
    use chrono::NaiveTime;
    use phrase_reminders_domain::ReminderSlot;

    #[tokio::test]
    async fn it_removes_a_custom_slot_and_its_entries() {
        let t = setup();
        let mut usecase = AddCustomSlotUseCase {
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        };
        usecase.execute(&t.ctx).await.unwrap();
        assert_eq!(t.backend.entries().len(), 7);

        let mut usecase = RemoveCustomSlotUseCase {
            slot_id: START_MILLIS,
        };
        let res = usecase.execute(&t.ctx).await.unwrap();
        assert_eq!(res.slots, ReminderSlot::defaults());
        assert!(t.backend.entries().is_empty());
        assert_eq!(res.notices[0].to_string(), "Reminder for 12:00 PM removed");
        assert_eq!(saved_slots(&t.ctx).await.unwrap(), ReminderSlot::defaults());
    }

    #[tokio::test]
    async fn it_protects_default_slots() {
        let t = setup();
        t.ctx
            .repos
            .reminder_slot_repo
            .save(&ReminderSlot::defaults())
            .await
            .unwrap();

        let mut usecase = RemoveCustomSlotUseCase { slot_id: 2 };
        assert_eq!(
            usecase.execute(&t.ctx).await,
            Err(ReminderError::ProtectedSlot("8:00 PM".into()))
        );
        assert_eq!(saved_slots(&t.ctx).await.unwrap(), ReminderSlot::defaults());
        assert_eq!(t.backend.schedule_calls(), 0);
        assert_eq!(t.backend.cancel_calls(), 0);
    }

    #[tokio::test]
    async fn it_keeps_the_slot_when_backend_is_unavailable() {
        let t = setup();
        let mut usecase = AddCustomSlotUseCase {
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        };
        let before = usecase.execute(&t.ctx).await.unwrap().slots;
        t.backend.set_available(false);

        let res = execute(
            RemoveCustomSlotUseCase {
                slot_id: START_MILLIS,
            },
            &t.ctx,
        )
        .await;
        assert!(matches!(res, Err(ReminderError::BackendUnavailable(_))));
        assert_eq!(saved_slots(&t.ctx).await.unwrap(), before);
        assert_eq!(t.backend.entries().len(), 7);

        let notices = t.notices.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert!(notices[0]
            .to_string()
            .starts_with("Something went wrong: The notification service is unavailable"));
    }
}
