use super::{notification_backend::INotificationBackend, phrases::IPhrasePicker};
use crate::{system::ISys, Config};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use futures::future;
use phrase_reminders_domain::{
    belongs_to, entry_identifier, parse_entry_identifier, ClockTime, NotificationTrigger,
    ReminderSlot, ScheduledNotification,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Translates `ReminderSlot`s into entries of the notification backend.
///
/// A slot is scheduled as one single fire entry per day for a window of
/// `days_to_schedule` days. The entries are named `{prefix}-{day_offset}` where
/// the prefix is the 24 hour form of the slot time, and the prefix is what the
/// slot keeps as its `notification_backend_ref`.
#[derive(Clone)]
pub struct ReminderNotifications {
    backend: Arc<dyn INotificationBackend>,
    sys: Arc<dyn ISys>,
    phrase_picker: Arc<dyn IPhrasePicker>,
    days_to_schedule: u32,
    capacity_ceiling: usize,
}

/// First day of a new window: today when the time has not passed yet, tomorrow otherwise
pub fn first_day_of_window(now: &NaiveDateTime, time: ClockTime) -> NaiveDate {
    let today = now.date();
    match today.and_hms_opt(time.hour, time.minute, 0) {
        Some(fire_at) if fire_at > *now => today,
        _ => today + Duration::days(1),
    }
}

impl ReminderNotifications {
    pub fn new(
        backend: Arc<dyn INotificationBackend>,
        sys: Arc<dyn ISys>,
        phrase_picker: Arc<dyn IPhrasePicker>,
        config: &Config,
    ) -> Self {
        Self {
            backend,
            sys,
            phrase_picker,
            days_to_schedule: config.days_to_schedule,
            capacity_ceiling: config.capacity_ceiling,
        }
    }

    pub fn days_to_schedule(&self) -> u32 {
        self.days_to_schedule
    }

    pub fn capacity_ceiling(&self) -> usize {
        self.capacity_ceiling
    }

    /// Schedules the full window of the slot and returns the backend ref of the slot.
    ///
    /// If the backend rejects one of the entries, the entries that were already
    /// created for this window are cancelled again before the error is returned.
    pub async fn schedule_recurring(
        &self,
        slot: &ReminderSlot,
        language_id: Option<&str>,
    ) -> anyhow::Result<String> {
        let prefix = slot.identifier_prefix();
        let time = slot.display_time.clock();
        let first_day = first_day_of_window(&self.sys.get_local_datetime(), time);

        let mut scheduled: Vec<String> = Vec::with_capacity(self.days_to_schedule as usize);
        for day_offset in 0..self.days_to_schedule {
            let identifier = entry_identifier(&prefix, day_offset);
            let date = first_day + Duration::days(day_offset as i64);
            let trigger = NotificationTrigger::on_date(date, time);
            let content = self.phrase_picker.pick_message(language_id);

            match self.backend.schedule(&identifier, &trigger, &content).await {
                Ok(id) => scheduled.push(id),
                Err(e) => {
                    for id in &scheduled {
                        if let Err(cancel_err) = self.backend.cancel(id).await {
                            warn!(
                                "Unable to clean up notification {} after failed scheduling. Err: {:?}",
                                id, cancel_err
                            );
                        }
                    }
                    return Err(e.context(format!(
                        "Unable to schedule notification {} for slot {}",
                        identifier, slot.id
                    )));
                }
            }
        }

        info!(
            "Scheduled {} notifications for slot {} at {} starting {}",
            scheduled.len(),
            slot.id,
            slot.display_time,
            first_day
        );
        Ok(prefix)
    }

    /// Cancels every entry registered under `backend_ref`. Nothing to do for `None`.
    pub async fn cancel_all(&self, backend_ref: Option<&str>) -> anyhow::Result<()> {
        let entries = self.list_entries_for(backend_ref).await?;
        let results = future::join_all(
            entries
                .iter()
                .map(|e| self.backend.cancel(&e.identifier))
                .collect::<Vec<_>>(),
        )
        .await;

        match results.into_iter().find_map(Result::err) {
            Some(e) => Err(e.context(format!(
                "Unable to cancel notifications of {}",
                backend_ref.unwrap_or_default()
            ))),
            None => Ok(()),
        }
    }

    pub async fn list_entries_for(
        &self,
        backend_ref: Option<&str>,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let backend_ref = match backend_ref {
            Some(backend_ref) => backend_ref,
            None => return Ok(vec![]),
        };
        let entries = self.backend.list_all_scheduled().await?;
        Ok(entries
            .into_iter()
            .filter(|e| belongs_to(&e.identifier, backend_ref))
            .collect())
    }

    /// Entries of `backend_ref` that have not fired yet
    pub async fn pending_entries_for(
        &self,
        backend_ref: Option<&str>,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let now = self.sys.get_local_datetime();
        let entries = self.list_entries_for(backend_ref).await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.trigger.is_pending(&now))
            .collect())
    }

    pub async fn count_all_scheduled(&self) -> anyhow::Result<usize> {
        Ok(self.backend.list_all_scheduled().await?.len())
    }

    pub async fn is_limit_reached(&self) -> anyhow::Result<bool> {
        Ok(self.count_all_scheduled().await? >= self.capacity_ceiling)
    }

    /// Identifiers of entries created by this app whose prefix is not one of `live_refs`
    pub async fn orphaned_entries(&self, live_refs: &HashSet<String>) -> anyhow::Result<Vec<String>> {
        let entries = self.backend.list_all_scheduled().await?;
        Ok(entries
            .into_iter()
            .filter(|e| match parse_entry_identifier(&e.identifier) {
                Some((prefix, _)) => !live_refs.contains(prefix),
                None => false,
            })
            .map(|e| e.identifier)
            .collect())
    }

    pub async fn cancel(&self, identifier: &str) -> anyhow::Result<()> {
        self.backend.cancel(identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryNotificationBackend, RandomPhrasePicker};
    use chrono_tz::Tz;
    use phrase_reminders_domain::{PhraseCatalog, ReminderTime};

    struct StaticTimeSys {}
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1613862000000 // Sat Feb 20 2021 23:00:00 UTC
        }

        fn get_timezone(&self) -> Tz {
            chrono_tz::UTC
        }
    }

    fn setup(backend: Arc<InMemoryNotificationBackend>) -> ReminderNotifications {
        let mut config = Config::new();
        config.days_to_schedule = 7;
        config.capacity_ceiling = 10;
        ReminderNotifications::new(
            backend,
            Arc::new(StaticTimeSys {}),
            Arc::new(RandomPhrasePicker::new(PhraseCatalog::default())),
            &config,
        )
    }

    fn slot(display: &str) -> ReminderSlot {
        ReminderSlot::new_custom(100, ReminderTime::parse(display).unwrap())
    }

    #[test]
    fn window_starts_today_only_if_time_is_ahead() {
        let now = NaiveDate::from_ymd_opt(2021, 2, 20)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert_eq!(
            first_day_of_window(&now, ClockTime::new(23, 30).unwrap()),
            NaiveDate::from_ymd_opt(2021, 2, 20).unwrap()
        );
        assert_eq!(
            first_day_of_window(&now, ClockTime::new(23, 0).unwrap()),
            NaiveDate::from_ymd_opt(2021, 2, 21).unwrap()
        );
        assert_eq!(
            first_day_of_window(&now, ClockTime::new(8, 0).unwrap()),
            NaiveDate::from_ymd_opt(2021, 2, 21).unwrap()
        );
    }

    #[tokio::test]
    async fn it_schedules_a_window_of_single_fire_entries() {
        let backend = Arc::new(InMemoryNotificationBackend::new(64));
        let notifications = setup(backend.clone());

        let backend_ref = notifications
            .schedule_recurring(&slot("8:00 AM"), None)
            .await
            .unwrap();
        assert_eq!(backend_ref, "8:00");

        let entries = backend.entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].identifier, "8:00-0");
        assert_eq!(
            entries[0].trigger,
            NotificationTrigger::Calendar {
                year: 2021,
                month: 2,
                day: 21,
                hour: 8,
                minute: 0
            }
        );
        assert_eq!(entries[6].identifier, "8:00-6");
        assert_eq!(
            entries[6].trigger.fires_at().unwrap().to_string(),
            "2021-02-27 08:00:00"
        );
        assert_eq!(
            notifications
                .pending_entries_for(Some("8:00"))
                .await
                .unwrap()
                .len(),
            7
        );
    }

    #[tokio::test]
    async fn it_cleans_up_partial_windows() {
        let backend = Arc::new(InMemoryNotificationBackend::new(64));
        let notifications = setup(backend.clone());
        backend.fail_schedules_after(3);

        assert!(notifications
            .schedule_recurring(&slot("9:15 PM"), None)
            .await
            .is_err());
        assert!(backend.entries().is_empty());
    }

    #[tokio::test]
    async fn it_cancels_only_entries_of_the_ref() {
        let backend = Arc::new(InMemoryNotificationBackend::new(64));
        let notifications = setup(backend.clone());
        notifications
            .schedule_recurring(&slot("8:00 AM"), None)
            .await
            .unwrap();
        notifications
            .schedule_recurring(&slot("6:00 PM"), None)
            .await
            .unwrap();
        assert_eq!(notifications.count_all_scheduled().await.unwrap(), 14);
        assert!(notifications.is_limit_reached().await.unwrap());

        assert!(notifications.cancel_all(None).await.is_ok());
        assert!(notifications.cancel_all(Some("7:00")).await.is_ok());
        assert!(notifications.cancel_all(Some("18:00")).await.is_ok());
        assert_eq!(notifications.count_all_scheduled().await.unwrap(), 7);
        assert!(notifications
            .list_entries_for(Some("18:00"))
            .await
            .unwrap()
            .is_empty());

        let live_refs = vec!["18:00".to_string()].into_iter().collect();
        assert_eq!(
            notifications.orphaned_entries(&live_refs).await.unwrap().len(),
            7
        );
    }
}
