use crate::time::{ClockTime, ReminderTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A `ReminderSlot` is a time of day at which the user wants to be
/// reminded to practice, every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSlot {
    /// Small fixed ids for the default slots, creation timestamp for custom slots
    pub id: i64,
    pub display_time: ReminderTime,
    /// Whether this slot should have live entries in the notification backend
    pub is_enabled: bool,
    /// Default slots can neither be deleted nor edited
    pub is_custom: bool,
    /// Identifier prefix of the backend entries of this slot.
    /// `None` means that nothing is currently scheduled.
    pub notification_backend_ref: Option<String>,
}

impl ReminderSlot {
    fn default_slot(id: i64, hour: u32) -> Self {
        Self {
            id,
            display_time: ReminderTime::from_clock(ClockTime { hour, minute: 0 }),
            is_enabled: false,
            is_custom: false,
            notification_backend_ref: None,
        }
    }

    /// Slots seeded on the first launch
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::default_slot(1, 8),
            Self::default_slot(2, 20),
        ]
    }

    pub fn new_custom(id: i64, display_time: ReminderTime) -> Self {
        Self {
            id,
            display_time,
            is_enabled: true,
            is_custom: true,
            notification_backend_ref: None,
        }
    }

    /// Prefix used for the identifiers of the backend entries of this slot
    pub fn identifier_prefix(&self) -> String {
        self.display_time.identifier()
    }
}

/// Removes slots with an id that has already been seen, keeping the first one.
/// Returns the ids of the removed slots.
pub fn dedup_slots(slots: &mut Vec<ReminderSlot>) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut removed = Vec::new();
    slots.retain(|slot| {
        if seen.insert(slot.id) {
            true
        } else {
            removed.push(slot.id);
            false
        }
    });
    removed
}

/// Creates an id for a new custom slot from the current timestamp, bumping it
/// until it does not collide with an existing slot.
pub fn next_custom_slot_id(timestamp_millis: i64, slots: &[ReminderSlot]) -> i64 {
    let mut id = timestamp_millis;
    while slots.iter().any(|s| s.id == id) {
        id += 1;
    }
    id
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_seeds_disabled_defaults() {
        let slots = ReminderSlot::defaults();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, 1);
        assert_eq!(slots[0].display_time.display(), "8:00 AM");
        assert_eq!(slots[1].id, 2);
        assert_eq!(slots[1].display_time.display(), "8:00 PM");
        for slot in &slots {
            assert!(!slot.is_enabled);
            assert!(!slot.is_custom);
            assert!(slot.notification_backend_ref.is_none());
        }
    }

    #[test]
    fn it_uses_the_persisted_json_layout() {
        let slot = ReminderSlot {
            id: 1700000000000,
            display_time: ReminderTime::parse("9:30 PM").unwrap(),
            is_enabled: true,
            is_custom: true,
            notification_backend_ref: Some("21:30".into()),
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1700000000000i64,
                "displayTime": "9:30 PM",
                "isEnabled": true,
                "isCustom": true,
                "notificationBackendRef": "21:30"
            })
        );

        let parsed: Vec<ReminderSlot> = serde_json::from_str(
            r#"[{"id":2,"displayTime":"8:00 PM","isEnabled":false,"isCustom":false,"notificationBackendRef":null}]"#,
        )
        .unwrap();
        assert_eq!(parsed, vec![ReminderSlot::defaults()[1].clone()]);
    }

    #[test]
    fn it_dedups_slots_by_id() {
        let mut slots = ReminderSlot::defaults();
        let mut duplicate = slots[0].clone();
        duplicate.is_enabled = true;
        slots.push(duplicate);

        assert_eq!(dedup_slots(&mut slots), vec![1]);
        assert_eq!(slots, ReminderSlot::defaults());
    }

    #[test]
    fn it_creates_unique_custom_ids() {
        let mut slots = ReminderSlot::defaults();
        assert_eq!(next_custom_slot_id(500, &slots), 500);
        slots.push(ReminderSlot::new_custom(
            500,
            ReminderTime::parse("1:00 PM").unwrap(),
        ));
        assert_eq!(next_custom_slot_id(500, &slots), 501);
    }
}
