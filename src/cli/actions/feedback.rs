use crate::{
    cli::actions::{print_json, Context, FeedbackAction},
    clinic::{feedback, AppointmentRef, Feedback, UserRef},
    forms::FeedbackForm,
    session::Access,
};
use anyhow::Result;

/// # Errors
/// Returns an error if an access guard denies the action, the form is invalid
/// or the API call fails.
pub async fn handle(context: &Context, action: FeedbackAction) -> Result<()> {
    match action {
        FeedbackAction::List { mine: true } => {
            let identity = context.require(Access::Authenticated)?;
            print_json(&feedback::list_feedback_for_user(context.api(), identity.user_id).await?)
        }
        FeedbackAction::List { mine: false } => {
            context.require(Access::Admin)?;
            print_json(&feedback::list_feedback(context.api()).await?)
        }
        FeedbackAction::Add {
            appointment_id,
            message,
            rating,
        } => {
            let identity = context.require(Access::Authenticated)?;
            FeedbackForm {
                message: &message,
                rating: Some(rating),
            }
            .validate()?;

            let entry = Feedback {
                message: message.trim().to_string(),
                rating,
                user: Some(UserRef {
                    user_id: identity.user_id,
                }),
                appointment: Some(AppointmentRef { appointment_id }),
                ..Feedback::default()
            };
            print_json(&feedback::create_feedback(context.api(), &entry).await?)
        }
    }
}
