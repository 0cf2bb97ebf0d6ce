use phrase_reminders_domain::{NotificationContent, PhraseCatalog};
use rand::Rng;

pub const REMINDER_TITLE: &str = "Time to learn a new phrase 🤓";
const FALLBACK_BODY: &str = "Open the app and keep your streak going.";

/// Creates the message of a single reminder notification
pub trait IPhrasePicker: Send + Sync {
    fn pick_message(&self, language_id: Option<&str>) -> NotificationContent;
}

/// Picks a random phrase of the selected language for every notification
pub struct RandomPhrasePicker {
    catalog: PhraseCatalog,
}

impl RandomPhrasePicker {
    pub fn new(catalog: PhraseCatalog) -> Self {
        Self { catalog }
    }
}

impl IPhrasePicker for RandomPhrasePicker {
    fn pick_message(&self, language_id: Option<&str>) -> NotificationContent {
        let phrases = self.catalog.phrases_for(language_id);
        let body = if phrases.is_empty() {
            FALLBACK_BODY.to_string()
        } else {
            let mut rng = rand::thread_rng();
            let phrase = &phrases[rng.gen_range(0..phrases.len())];
            format!("{} = {}", phrase.phrase, phrase.translation)
        };

        NotificationContent {
            title: REMINDER_TITLE.to_string(),
            body,
        }
    }
}
