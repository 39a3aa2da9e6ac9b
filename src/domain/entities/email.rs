use ammonia::clean_text;
use uuid::Uuid;

use crate::entities::consultation::ConsultationRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingEmail {
    /// Internal notification sent to the business inbox. Replies go straight to the requester.
    pub fn consultation_notification(
        request: &ConsultationRequest,
        recipient: &str,
        reference: &Uuid,
    ) -> Self {
        let rows = detail_rows(request);

        let mut text_body = String::from("A new consultation request has been submitted.\n\n");
        for (label, value) in &rows {
            text_body.push_str(&format!("{}: {}\n", label, value));
        }
        text_body.push_str(&format!("\nMessage:\n{}\n\nReference: {}\n", request.message, reference));

        let mut html_body = String::from("<h2>New consultation request</h2><table>");
        for (label, value) in &rows {
            html_body.push_str(&format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                label,
                clean_text(value)
            ));
        }
        html_body.push_str(&format!(
            "</table><h3>Message</h3><p>{}</p><p><small>Reference: {}</small></p>",
            clean_text(&request.message),
            reference
        ));

        OutgoingEmail {
            to: recipient.to_string(),
            reply_to: Some(request.email.clone()),
            subject: format!("New consultation request from {}", request.name),
            text_body,
            html_body,
        }
    }

    /// Acknowledgement sent back to the person who filled in the form.
    pub fn consultation_confirmation(request: &ConsultationRequest, reference: &Uuid) -> Self {
        let text_body = format!(
            "Hi {},\n\nThank you for your consultation request. We have received your message \
             and will get back to you shortly.\n\nYour reference is {}.\n\nKind regards,\nPlatteneye",
            request.name, reference
        );
        let html_body = format!(
            "<p>Hi {},</p><p>Thank you for your consultation request. We have received your \
             message and will get back to you shortly.</p><p>Your reference is <strong>{}</strong>.</p>\
             <p>Kind regards,<br>Platteneye</p>",
            clean_text(&request.name),
            reference
        );

        OutgoingEmail {
            to: request.email.clone(),
            reply_to: None,
            subject: "We've received your consultation request".to_string(),
            text_body,
            html_body,
        }
    }
}

fn detail_rows(request: &ConsultationRequest) -> Vec<(&'static str, &str)> {
    let mut rows = vec![("Name", request.name.as_str()), ("Email", request.email.as_str())];
    if let Some(phone) = &request.phone {
        rows.push(("Phone", phone.as_str()));
    }
    if let Some(company) = &request.company {
        rows.push(("Company", company.as_str()));
    }
    if let Some(service) = &request.service {
        rows.push(("Service", service.as_str()));
    }
    rows
}
