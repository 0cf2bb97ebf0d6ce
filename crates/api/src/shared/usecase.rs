use phrase_reminders_domain::Notice;
use phrase_reminders_infra::ReminderContext;
use std::fmt::{Debug, Display};
use tracing::error;

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response: Debug;
    type Error: Debug + Display;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error>;

    /// Notices to present to the user after a successful execution
    fn notices(_res: &Self::Response) -> Vec<Notice> {
        Default::default()
    }
}

/// Executes the `UseCase` and presents the outcome to the user: the notices of
/// the response on success, an error notice otherwise.
#[tracing::instrument(name = "Executing usecase", skip(ctx))]
pub async fn execute<U>(mut usecase: U, ctx: &ReminderContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let res = usecase.execute(ctx).await;

    match &res {
        Ok(res) => {
            for notice in U::notices(res) {
                ctx.notice_sink.publish(&notice);
            }
        }
        Err(e) => {
            error!("Use case {} error: {:?}", U::NAME, e);
            ctx.notice_sink.publish(&Notice::Error(e.to_string()));
        }
    }

    res
}
