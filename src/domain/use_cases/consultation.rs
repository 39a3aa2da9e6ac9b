use uuid::Uuid;

use crate::{
    constants::SUBMISSION_SUCCESS_MESSAGE,
    entities::{
        consultation::{ConsultationRequest, SubmissionResponse},
        email::OutgoingEmail,
    },
    errors::AppError,
    repositories::email::EmailDispatcher,
};

pub struct ConsultationHandler<E>
where
    E: EmailDispatcher,
{
    pub email_dispatcher: E,
    pub notification_recipient: String,
}

impl<E> ConsultationHandler<E>
where
    E: EmailDispatcher,
{
    pub fn new(email_dispatcher: E, notification_recipient: impl Into<String>) -> Self {
        ConsultationHandler {
            email_dispatcher,
            notification_recipient: notification_recipient.into(),
        }
    }

    /// Validates the request, then sends the inbox notification followed by the
    /// confirmation to the requester. Nothing is sent when validation fails.
    pub async fn submit(&self, request: ConsultationRequest) -> Result<SubmissionResponse, AppError> {
        let request = request.normalized();
        request.check().map_err(AppError::ValidationError)?;

        let reference = Uuid::new_v4();

        let notification = OutgoingEmail::consultation_notification(
            &request,
            &self.notification_recipient,
            &reference,
        );
        self.email_dispatcher.send_email(&notification).await?;

        let confirmation = OutgoingEmail::consultation_confirmation(&request, &reference);
        self.email_dispatcher.send_email(&confirmation).await?;

        tracing::info!(%reference, "Consultation request dispatched");

        Ok(SubmissionResponse {
            success: true,
            message: SUBMISSION_SUCCESS_MESSAGE.to_string(),
        })
    }
}
