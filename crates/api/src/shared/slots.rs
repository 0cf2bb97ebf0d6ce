use crate::error::ReminderError;
use phrase_reminders_domain::{dedup_slots, Notice, ReminderSlot, ReminderTime};
use phrase_reminders_infra::ReminderContext;
use tracing::{error, warn};

/// Result of every operation on the `ReminderSlot`s. The ui re-renders from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotsResponse {
    pub slots: Vec<ReminderSlot>,
    /// No new slots can be created while this is set
    pub is_limit_reached: bool,
    pub notices: Vec<Notice>,
}

/// Loads the persisted slots, falling back to the defaults on the first launch
pub async fn load_slots(ctx: &ReminderContext) -> Result<Vec<ReminderSlot>, ReminderError> {
    let slots = ctx.repos.reminder_slot_repo.load().await.map_err(|e| {
        error!("Unable to load reminder slots. Err: {:?}", e);
        ReminderError::persistence(e)
    })?;
    let mut slots = slots.unwrap_or_else(ReminderSlot::defaults);
    let removed = dedup_slots(&mut slots);
    if !removed.is_empty() {
        warn!("Dropped reminder slots with duplicated ids: {:?}", removed);
    }
    Ok(slots)
}

/// Persists the full list. Backend changes made before are not rolled back when this fails.
pub async fn save_slots(ctx: &ReminderContext, slots: &[ReminderSlot]) -> Result<(), ReminderError> {
    ctx.repos
        .reminder_slot_repo
        .save(slots)
        .await
        .map_err(|e| {
            error!(
                "Unable to save reminder slots, the notification backend is now ahead of the saved slots. Err: {:?}",
                e
            );
            ReminderError::persistence(e)
        })
}

/// Whether the capacity ceiling has been reached. Treated as reached when the
/// backend can not be queried, so no slots get created while it is unavailable.
pub async fn is_limit_reached(ctx: &ReminderContext) -> bool {
    match ctx.notifications().is_limit_reached().await {
        Ok(reached) => reached,
        Err(e) => {
            warn!("Unable to count scheduled notifications. Err: {:?}", e);
            true
        }
    }
}

pub async fn current_language(ctx: &ReminderContext) -> Option<String> {
    match ctx.repos.language_repo.load().await {
        Ok(language_id) => language_id,
        Err(e) => {
            warn!("Unable to load the selected language. Err: {:?}", e);
            None
        }
    }
}

pub fn find_slot_index(slots: &[ReminderSlot], slot_id: i64) -> Result<usize, ReminderError> {
    slots
        .iter()
        .position(|s| s.id == slot_id)
        .ok_or(ReminderError::SlotNotFound(slot_id))
}

/// Slots share backend entries when they have the same time, so a time can only be used once
pub fn ensure_time_available(
    slots: &[ReminderSlot],
    time: &ReminderTime,
    except_slot_id: Option<i64>,
) -> Result<(), ReminderError> {
    let taken = slots
        .iter()
        .any(|s| Some(s.id) != except_slot_id && s.display_time == *time);
    if taken {
        return Err(ReminderError::DuplicateTime(time.display()));
    }
    Ok(())
}

/// The ref under which entries of the slot may live in the backend.
/// An enabled slot that never got its ref saved may still own entries under its prefix.
pub fn live_backend_ref(slot: &ReminderSlot) -> Option<String> {
    match &slot.notification_backend_ref {
        Some(backend_ref) => Some(backend_ref.clone()),
        None if slot.is_enabled => Some(slot.identifier_prefix()),
        None => None,
    }
}
