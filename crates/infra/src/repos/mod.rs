mod kv;
mod language;
mod reminder_slot;

pub use kv::{FileKVRepo, IKVRepo, InMemoryKVRepo};
pub use language::{ILanguageRepo, KVLanguageRepo};
pub use reminder_slot::{IReminderSlotRepo, KVReminderSlotRepo};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub key_value_repo: Arc<dyn IKVRepo>,
    pub reminder_slot_repo: Arc<dyn IReminderSlotRepo>,
    pub language_repo: Arc<dyn ILanguageRepo>,
}

impl Repos {
    pub fn create(key_value_repo: Arc<dyn IKVRepo>) -> Self {
        Self {
            reminder_slot_repo: Arc::new(KVReminderSlotRepo::new(key_value_repo.clone())),
            language_repo: Arc::new(KVLanguageRepo::new(key_value_repo.clone())),
            key_value_repo,
        }
    }

    pub fn create_file(storage_dir: &Path) -> Self {
        info!("Using preference storage at {}", storage_dir.display());
        Self::create(Arc::new(FileKVRepo::new(storage_dir)))
    }

    pub fn create_inmemory() -> Self {
        Self::create(Arc::new(InMemoryKVRepo::new()))
    }
}
