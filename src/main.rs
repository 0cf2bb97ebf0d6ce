use phrase_reminders::{get_subscriber, init_subscriber, Application};
use phrase_reminders_infra::{setup_context, Config, InMemoryNotificationBackend, LogNoticeSink};
use std::sync::Arc;
use tracing::info;

/// Loads the saved reminder slots and shows what would be scheduled on a
/// backend with the configured platform limit
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("phrase_reminders".into(), "info".into());
    init_subscriber(subscriber)?;

    let backend = Arc::new(InMemoryNotificationBackend::new(
        Config::new().platform_limit,
    ));
    let context = setup_context(backend.clone(), Arc::new(LogNoticeSink {})).await;

    let app = Application::new(context).await?;
    let res = app.slots().await?;
    for slot in &res.slots {
        info!(
            "Slot {} at {} is {}",
            slot.id,
            slot.display_time,
            if slot.is_enabled { "on" } else { "off" }
        );
    }
    for entry in backend.entries() {
        info!(
            "{} fires at {:?}: {}",
            entry.identifier,
            entry.trigger.fires_at(),
            entry.content.body
        );
    }
    Ok(())
}
