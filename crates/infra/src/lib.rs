mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, LANGUAGE_KEY, REMINDER_SLOTS_KEY};
pub use repos::{
    FileKVRepo, IKVRepo, ILanguageRepo, IReminderSlotRepo, InMemoryKVRepo, KVLanguageRepo,
    KVReminderSlotRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tracing::{info, warn};

use phrase_reminders_domain::PhraseCatalog;

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notification_backend: Arc<dyn INotificationBackend>,
    pub phrase_picker: Arc<dyn IPhrasePicker>,
    pub notice_sink: Arc<dyn INoticeSink>,
}

impl ReminderContext {
    /// Context where storage and the notification backend live in memory
    pub fn create_inmemory() -> Self {
        let config = Config::new();
        Self {
            repos: Repos::create_inmemory(),
            sys: Arc::new(RealSys {
                timezone: config.timezone,
            }),
            notification_backend: Arc::new(InMemoryNotificationBackend::new(
                config.platform_limit,
            )),
            phrase_picker: Arc::new(RandomPhrasePicker::new(PhraseCatalog::default())),
            notice_sink: Arc::new(LogNoticeSink {}),
            config,
        }
    }

    /// Adapter between `ReminderSlot`s and the notification backend
    pub fn notifications(&self) -> ReminderNotifications {
        ReminderNotifications::new(
            self.notification_backend.clone(),
            self.sys.clone(),
            self.phrase_picker.clone(),
            &self.config,
        )
    }
}

async fn load_phrase_catalog(config: &Config) -> PhraseCatalog {
    let path = match &config.phrase_catalog_path {
        Some(path) => path,
        None => {
            info!("No phrase catalog configured, reminders will use a generic message");
            return PhraseCatalog::default();
        }
    };
    let catalog = match tokio::fs::read_to_string(path).await {
        Ok(json) => PhraseCatalog::from_json(&json),
        Err(e) => Err(e.into()),
    };
    match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(
                "Unable to load phrase catalog from {}. Err: {:?}",
                path.display(),
                e
            );
            PhraseCatalog::default()
        }
    }
}

/// Will setup the infrastructure context given the environment and the
/// notification backend of the platform
pub async fn setup_context(
    notification_backend: Arc<dyn INotificationBackend>,
    notice_sink: Arc<dyn INoticeSink>,
) -> ReminderContext {
    let config = Config::new();
    let phrase_catalog = load_phrase_catalog(&config).await;

    ReminderContext {
        repos: Repos::create_file(&config.storage_dir),
        sys: Arc::new(RealSys {
            timezone: config.timezone,
        }),
        notification_backend,
        phrase_picker: Arc::new(RandomPhrasePicker::new(phrase_catalog)),
        notice_sink,
        config,
    }
}
