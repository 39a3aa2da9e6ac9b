use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9+()\- ]{7,20}$").expect("phone regex is valid")
});

/// Fields in the order they appear on the form; the first failing one is reported.
const FIELD_ORDER: [&str; 6] = ["name", "email", "phone", "company", "service", "message"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_REGEX, message = "Please provide a valid phone number"))]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 150, message = "Company name must be at most 150 characters"))]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Service must be at most 100 characters"))]
    pub service: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Message must be between 10 and 5000 characters"))]
    pub message: String,
}

impl ConsultationRequest {
    /// Trims every field, drops blank optionals and lower-cases the email.
    pub fn normalized(self) -> Self {
        ConsultationRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: trimmed(self.phone),
            company: trimmed(self.company),
            service: trimmed(self.service),
            message: self.message.trim().to_string(),
        }
    }

    /// Runs the field rules and returns the first failure as a single message.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|errors| first_validation_message(&errors))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", e.code))
        })
        .next()
        .unwrap_or_else(|| "Invalid consultation request".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}
