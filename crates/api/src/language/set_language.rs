use crate::{
    error::ReminderError,
    reconcile::{ReconcileRemindersUseCase, ReconcileReport, ReconcileTrigger},
    shared::usecase::UseCase,
};
use phrase_reminders_domain::Notice;
use phrase_reminders_infra::ReminderContext;
use tracing::error;

/// Selects the language of the phrases and rebuilds the reminders so that
/// upcoming notifications use phrases of it
#[derive(Debug)]
pub struct SetLanguageUseCase {
    pub language_id: String,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetLanguageUseCase {
    type Response = ReconcileReport;

    type Error = ReminderError;

    const NAME: &'static str = "SetLanguage";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .language_repo
            .save(&self.language_id)
            .await
            .map_err(|e| {
                error!("Unable to save language {}. Err: {:?}", self.language_id, e);
                ReminderError::persistence(e)
            })?;

        let mut reconcile = ReconcileRemindersUseCase {
            trigger: ReconcileTrigger::LanguageChanged,
        };
        reconcile.execute(ctx).await
    }

    fn notices(res: &Self::Response) -> Vec<Notice> {
        res.notices.clone()
    }
}
