use super::kv::IKVRepo;
use crate::config::REMINDER_SLOTS_KEY;
use anyhow::Context;
use phrase_reminders_domain::ReminderSlot;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait IReminderSlotRepo: Send + Sync {
    /// `None` when no slots have ever been saved, i.e. on the first launch
    async fn load(&self) -> anyhow::Result<Option<Vec<ReminderSlot>>>;
    /// Replaces the whole list
    async fn save(&self, slots: &[ReminderSlot]) -> anyhow::Result<()>;
}

/// Keeps the slots as one json array under a single key
pub struct KVReminderSlotRepo {
    kv: Arc<dyn IKVRepo>,
}

impl KVReminderSlotRepo {
    pub fn new(kv: Arc<dyn IKVRepo>) -> Self {
        Self { kv }
    }
}

#[async_trait::async_trait]
impl IReminderSlotRepo for KVReminderSlotRepo {
    async fn load(&self) -> anyhow::Result<Option<Vec<ReminderSlot>>> {
        match self.kv.get(REMINDER_SLOTS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .context("Stored reminder slots are malformed"),
            None => Ok(None),
        }
    }

    async fn save(&self, slots: &[ReminderSlot]) -> anyhow::Result<()> {
        let json = serde_json::to_string(slots)?;
        self.kv.set(REMINDER_SLOTS_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::kv::InMemoryKVRepo;
    use phrase_reminders_domain::ReminderTime;

    #[tokio::test]
    async fn it_saves_and_loads_slots() {
        let kv = Arc::new(InMemoryKVRepo::new());
        let repo = KVReminderSlotRepo::new(kv.clone());

        assert!(repo.load().await.unwrap().is_none());

        let mut slots = ReminderSlot::defaults();
        let mut custom = ReminderSlot::new_custom(1700000000000, ReminderTime::parse("7:30 PM").unwrap());
        custom.notification_backend_ref = Some("19:30".into());
        slots.push(custom);

        repo.save(&slots).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(slots));

        let raw = kv.get(REMINDER_SLOTS_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with("[{\"id\":1,\"displayTime\":\"8:00 AM\""));
    }

    #[tokio::test]
    async fn it_rejects_malformed_slots() {
        let kv = Arc::new(InMemoryKVRepo::new());
        kv.set(REMINDER_SLOTS_KEY, "{\"3\":{\"isEnabled\":true}}")
            .await
            .unwrap();
        let repo = KVReminderSlotRepo::new(kv);
        assert!(repo.load().await.is_err());
    }
}
