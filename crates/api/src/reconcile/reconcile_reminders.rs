use crate::{
    error::ReminderError,
    shared::{
        slots::{current_language, is_limit_reached, live_backend_ref, load_slots, save_slots},
        usecase::UseCase,
    },
};
use futures::future;
use phrase_reminders_domain::{Notice, ReminderSlot};
use phrase_reminders_infra::{ReminderContext, ReminderNotifications};
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    /// The app has been started and the slots have been loaded
    ColdStart,
    /// The app has regained focus
    Focused,
    /// The selected language has changed, so every enabled slot needs new content
    LanguageChanged,
}

/// Repairs the notification backend so that it reflects the saved `ReminderSlot`s.
///
/// Enabled slots that are running out of pending entries get their window refilled,
/// disabled slots that still own entries get them cancelled and entries that belong
/// to no enabled slot are removed. Running it twice in a row does nothing the
/// second time.
#[derive(Debug)]
pub struct ReconcileRemindersUseCase {
    pub trigger: ReconcileTrigger,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileFailure {
    /// `None` when the failure is not bound to a single slot
    pub slot_id: Option<i64>,
    pub display_time: Option<String>,
    pub reason: String,
}

impl Display for ReconcileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.display_time {
            Some(display_time) => write!(f, "{} ({})", display_time, self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub slots: Vec<ReminderSlot>,
    /// Slots that got a new window
    pub renewed: Vec<i64>,
    /// Disabled slots that had their leftover entries cancelled
    pub cleared: Vec<i64>,
    pub failures: Vec<ReconcileFailure>,
    pub orphans_removed: usize,
    pub is_limit_reached: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug)]
enum SlotRepair {
    Fresh,
    /// Enabled slot with enough entries whose ref was never saved
    Adopted(String),
    Cleared,
    Renewed(String),
    Failed {
        /// The old entries are gone, so the ref is no longer valid
        ref_cancelled: bool,
        error: anyhow::Error,
    },
}

async fn repair_slot(
    slot: &ReminderSlot,
    rebuild: bool,
    renewal_threshold: usize,
    language: Option<&str>,
    notifications: &ReminderNotifications,
) -> SlotRepair {
    if !slot.is_enabled {
        if slot.notification_backend_ref.is_none() {
            return SlotRepair::Fresh;
        }
        return match notifications
            .cancel_all(slot.notification_backend_ref.as_deref())
            .await
        {
            Ok(()) => SlotRepair::Cleared,
            Err(error) => SlotRepair::Failed {
                ref_cancelled: false,
                error,
            },
        };
    }

    let backend_ref = live_backend_ref(slot);
    let prefix = slot.identifier_prefix();
    if !rebuild && backend_ref.as_deref() == Some(prefix.as_str()) {
        match notifications.pending_entries_for(backend_ref.as_deref()).await {
            Ok(pending) if pending.len() >= renewal_threshold => {
                return match slot.notification_backend_ref {
                    Some(_) => SlotRepair::Fresh,
                    None => SlotRepair::Adopted(prefix),
                };
            }
            Ok(pending) => info!(
                "Slot {} has {} pending notifications left, renewing",
                slot.id,
                pending.len()
            ),
            Err(error) => {
                return SlotRepair::Failed {
                    ref_cancelled: false,
                    error,
                }
            }
        }
    }

    if let Err(error) = notifications.cancel_all(backend_ref.as_deref()).await {
        return SlotRepair::Failed {
            ref_cancelled: false,
            error,
        };
    }
    match notifications.schedule_recurring(slot, language).await {
        Ok(backend_ref) => SlotRepair::Renewed(backend_ref),
        Err(error) => SlotRepair::Failed {
            ref_cancelled: true,
            error,
        },
    }
}

/// Cancels the entries that no enabled slot owns. Returns the number of cancelled entries.
async fn sweep_orphans(
    slots: &[ReminderSlot],
    notifications: &ReminderNotifications,
) -> anyhow::Result<usize> {
    let live_refs: HashSet<String> = slots
        .iter()
        .filter(|s| s.is_enabled)
        .filter_map(live_backend_ref)
        .collect();
    let orphans = notifications.orphaned_entries(&live_refs).await?;
    if orphans.is_empty() {
        return Ok(0);
    }
    warn!("Found {} orphaned notifications: {:?}", orphans.len(), orphans);

    let results =
        future::join_all(orphans.iter().map(|id| notifications.cancel(id)).collect::<Vec<_>>())
            .await;
    let removed = results.iter().filter(|r| r.is_ok()).count();
    match results.into_iter().find_map(Result::err) {
        Some(e) => Err(e.context(format!(
            "Unable to cancel {} orphaned notifications",
            orphans.len() - removed
        ))),
        None => Ok(removed),
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReconcileRemindersUseCase {
    type Response = ReconcileReport;

    type Error = ReminderError;

    const NAME: &'static str = "ReconcileReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let mut slots = load_slots(ctx).await?;
        let notifications = ctx.notifications();
        let language = current_language(ctx).await;
        let rebuild = self.trigger == ReconcileTrigger::LanguageChanged;

        let repairs = future::join_all(
            slots
                .iter()
                .map(|slot| {
                    repair_slot(
                        slot,
                        rebuild,
                        ctx.config.renewal_threshold,
                        language.as_deref(),
                        &notifications,
                    )
                })
                .collect::<Vec<_>>(),
        )
        .await;

        let mut changed = false;
        let mut renewed = vec![];
        let mut cleared = vec![];
        let mut failures = vec![];
        let mut notices = vec![];
        for (slot, repair) in slots.iter_mut().zip(repairs) {
            match repair {
                SlotRepair::Fresh => (),
                SlotRepair::Adopted(backend_ref) => {
                    slot.notification_backend_ref = Some(backend_ref);
                    changed = true;
                }
                SlotRepair::Cleared => {
                    info!("Cancelled leftover notifications of disabled slot {}", slot.id);
                    slot.notification_backend_ref = None;
                    cleared.push(slot.id);
                    notices.push(Notice::cancelled(slot));
                    changed = true;
                }
                SlotRepair::Renewed(backend_ref) => {
                    slot.notification_backend_ref = Some(backend_ref);
                    renewed.push(slot.id);
                    notices.push(Notice::renewed(slot));
                    changed = true;
                }
                SlotRepair::Failed {
                    ref_cancelled,
                    error,
                } => {
                    error!("Unable to repair slot {}. Err: {:?}", slot.id, error);
                    if ref_cancelled && slot.notification_backend_ref.is_some() {
                        slot.notification_backend_ref = None;
                        changed = true;
                    }
                    failures.push(ReconcileFailure {
                        slot_id: Some(slot.id),
                        display_time: Some(slot.display_time.display()),
                        reason: format!("{:#}", error),
                    });
                }
            }
        }

        let orphans_removed = match sweep_orphans(&slots, &notifications).await {
            Ok(removed) => removed,
            Err(e) => {
                error!("Unable to remove orphaned notifications. Err: {:?}", e);
                failures.push(ReconcileFailure {
                    slot_id: None,
                    display_time: None,
                    reason: format!("{:#}", e),
                });
                0
            }
        };

        if changed {
            if let Err(e) = save_slots(ctx, &slots).await {
                failures.push(ReconcileFailure {
                    slot_id: None,
                    display_time: None,
                    reason: e.to_string(),
                });
            }
        }

        if !failures.is_empty() {
            let reasons = failures
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            notices.push(Notice::Error(format!(
                "Some reminders could not be refreshed: {}",
                reasons
            )));
        }

        Ok(ReconcileReport {
            is_limit_reached: is_limit_reached(ctx).await,
            slots,
            renewed,
            cleared,
            failures,
            orphans_removed,
            notices,
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
        shared::test_helpers::{count_entries, saved_slots, setup, TestContext, DAY_MILLIS},
        slot::{AddCustomSlotUseCase, ToggleSlotUseCase},
    };
    use chrono::NaiveTime;
    use phrase_reminders_infra::ISys;

    const HOUR_MILLIS: i64 = 1000 * 60 * 60;

    async fn enable(t: &TestContext, slot_id: i64) {
        let mut usecase = ToggleSlotUseCase { slot_id };
        usecase.execute(&t.ctx).await.unwrap();
    }

    async fn reconcile(t: &TestContext, trigger: ReconcileTrigger) -> ReconcileReport {
        let mut usecase = ReconcileRemindersUseCase { trigger };
        usecase.execute(&t.ctx).await.unwrap()
    }

    fn advance_and_deliver(t: &TestContext, millis: i64) {
        t.sys.advance_millis(millis);
        t.backend.deliver_due(&t.sys.get_local_datetime());
    }

    #[tokio::test]
    async fn it_is_idempotent() {
        let t = setup();
        enable(&t, 1).await;
        enable(&t, 2).await;

        let report = reconcile(&t, ReconcileTrigger::ColdStart).await;
        assert!(report.renewed.is_empty());
        assert!(report.notices.is_empty());
        let schedule_calls = t.backend.schedule_calls();
        let cancel_calls = t.backend.cancel_calls();
        let entries = t.backend.entries();

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert!(report.renewed.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.orphans_removed, 0);
        assert_eq!(t.backend.schedule_calls(), schedule_calls);
        assert_eq!(t.backend.cancel_calls(), cancel_calls);
        assert_eq!(t.backend.entries(), entries);
    }

    #[tokio::test]
    async fn it_renews_a_slot_with_one_entry_left() {
        let t = setup();
        enable(&t, 1).await;
        // Sat Feb 27 2021 07:00, only the 8:00 entry of today is left
        advance_and_deliver(&t, 6 * DAY_MILLIS + 8 * HOUR_MILLIS);
        assert_eq!(count_entries(&t.backend, "8:00"), 1);

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert_eq!(report.renewed, vec![1]);
        assert_eq!(count_entries(&t.backend, "8:00"), 7);
        assert_eq!(
            report.notices,
            vec![Notice::Renewed {
                slot_id: 1,
                display_time: "8:00 AM".into()
            }]
        );
        let first = t
            .backend
            .entries()
            .into_iter()
            .find(|e| e.identifier == "8:00-0")
            .unwrap();
        assert_eq!(
            first.trigger.fires_at().unwrap().to_string(),
            "2021-02-27 08:00:00"
        );

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert!(report.renewed.is_empty());
    }

    #[tokio::test]
    async fn it_keeps_a_slot_with_enough_entries() {
        let t = setup();
        enable(&t, 1).await;
        // Fri Feb 26 2021 07:00, the 8:00 entries of today and tomorrow are left
        advance_and_deliver(&t, 5 * DAY_MILLIS + 8 * HOUR_MILLIS);
        assert_eq!(count_entries(&t.backend, "8:00"), 2);

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert!(report.renewed.is_empty());
        assert_eq!(count_entries(&t.backend, "8:00"), 2);
    }

    #[tokio::test]
    async fn it_rebuilds_every_enabled_slot_on_language_change() {
        let t = setup();
        enable(&t, 2).await;
        let schedule_calls = t.backend.schedule_calls();

        let report = reconcile(&t, ReconcileTrigger::LanguageChanged).await;
        assert_eq!(report.renewed, vec![2]);
        assert_eq!(t.backend.schedule_calls(), schedule_calls + 7);
        assert_eq!(count_entries(&t.backend, "20:00"), 7);
        assert!(!report.slots[0].is_enabled);
    }

    #[tokio::test]
    async fn it_clears_entries_of_disabled_slots() {
        let t = setup();
        enable(&t, 2).await;
        let mut slots = saved_slots(&t.ctx).await.unwrap();
        slots[1].is_enabled = false;
        t.ctx.repos.reminder_slot_repo.save(&slots).await.unwrap();

        let report = reconcile(&t, ReconcileTrigger::ColdStart).await;
        assert_eq!(report.cleared, vec![2]);
        assert_eq!(
            report.notices,
            vec![Notice::Cancelled {
                slot_id: 2,
                display_time: "8:00 PM".into()
            }]
        );
        assert!(t.backend.entries().is_empty());
        assert_eq!(saved_slots(&t.ctx).await.unwrap(), ReminderSlot::defaults());
    }

    #[tokio::test]
    async fn it_adopts_entries_of_an_enabled_slot_without_ref() {
        let t = setup();
        enable(&t, 1).await;
        let mut slots = saved_slots(&t.ctx).await.unwrap();
        slots[0].notification_backend_ref = None;
        t.ctx.repos.reminder_slot_repo.save(&slots).await.unwrap();
        let schedule_calls = t.backend.schedule_calls();

        let report = reconcile(&t, ReconcileTrigger::ColdStart).await;
        assert!(report.renewed.is_empty());
        assert_eq!(report.slots[0].notification_backend_ref, Some("8:00".into()));
        assert_eq!(t.backend.schedule_calls(), schedule_calls);
        assert_eq!(count_entries(&t.backend, "8:00"), 7);
    }

    #[tokio::test]
    async fn it_removes_orphaned_entries() {
        let t = setup();
        t.kv.set_fail_writes(true);
        let mut usecase = AddCustomSlotUseCase {
            time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        };
        assert!(usecase.execute(&t.ctx).await.is_err());
        assert_eq!(count_entries(&t.backend, "6:00"), 7);
        t.kv.set_fail_writes(false);

        let report = reconcile(&t, ReconcileTrigger::ColdStart).await;
        assert_eq!(report.orphans_removed, 7);
        assert!(t.backend.entries().is_empty());
    }

    #[tokio::test]
    async fn it_isolates_failures_of_single_slots() {
        let t = setup();
        enable(&t, 1).await;
        enable(&t, 2).await;
        // Sat Feb 27 2021 21:00, every entry has fired
        advance_and_deliver(&t, 6 * DAY_MILLIS + 22 * HOUR_MILLIS);
        assert!(t.backend.entries().is_empty());
        t.backend.fail_schedules_after(7);

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert_eq!(report.renewed.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(t.backend.entries().len(), 7);
        assert_eq!(report.notices.len(), 2);
        assert!(report.notices[1].is_error());
        assert!(report.slots.iter().all(|s| s.is_enabled));
    }

    #[tokio::test]
    async fn it_reports_an_unavailable_backend() {
        let t = setup();
        enable(&t, 1).await;
        t.backend.set_available(false);

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].slot_id, Some(1));
        assert!(report.is_limit_reached);
        assert_eq!(
            report.notices.iter().filter(|n| n.is_error()).count(),
            1
        );
    }

    #[tokio::test]
    async fn it_is_idempotent_with_a_single_day_window() {
        let mut t = setup();
        t.ctx.config.days_to_schedule = 1;
        t.ctx.config.renewal_threshold = 1;
        enable(&t, 1).await;
        assert_eq!(count_entries(&t.backend, "8:00"), 1);
        let schedule_calls = t.backend.schedule_calls();

        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert!(report.renewed.is_empty());
        let report = reconcile(&t, ReconcileTrigger::Focused).await;
        assert!(report.renewed.is_empty());
        assert_eq!(t.backend.schedule_calls(), schedule_calls);
    }
}
