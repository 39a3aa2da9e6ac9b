use derive_more::Display;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";
pub const INVALID_RESPONSE_MESSAGE: &str = "Received an invalid response from the server.";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to submit consultation request";

/// Where a client-side failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Server(u16),
    Rejected,
    InvalidResponse,
}

/// The single error shape surfaced to form-handling code, whatever went wrong.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Non-2xx response. `message` is the `error` field of the body, when there was one.
    pub fn server(status: u16, message: Option<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Server(status),
            message: non_empty(message).unwrap_or_else(|| format!("Server error: {}", status)),
        }
    }

    /// 2xx response whose body did not report success.
    pub fn rejected(message: Option<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Rejected,
            message: non_empty(message).unwrap_or_else(|| SUBMISSION_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Server(status) => Some(status),
            _ => None,
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::warn!(error = %err, "Could not decode consultation API response");
            return ApiError {
                kind: ApiErrorKind::InvalidResponse,
                message: INVALID_RESPONSE_MESSAGE.to_string(),
            };
        }
        tracing::warn!(error = %err, "Consultation API request failed");
        ApiError {
            kind: ApiErrorKind::Network,
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError {
            kind: ApiErrorKind::Network,
            message: format!("Invalid API endpoint: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_prefers_body_message() {
        let err = ApiError::server(400, Some("bad".into()));
        assert_eq!(err.to_string(), "bad");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn server_error_falls_back_to_status() {
        assert_eq!(ApiError::server(502, None).message, "Server error: 502");
        assert_eq!(ApiError::server(500, Some("  ".into())).message, "Server error: 500");
    }

    #[test]
    fn rejected_falls_back_to_generic_message() {
        assert_eq!(ApiError::rejected(None).message, SUBMISSION_FAILED_MESSAGE);
        assert_eq!(ApiError::rejected(Some("x".into())).message, "x");
        assert_eq!(ApiError::rejected(None).kind, ApiErrorKind::Rejected);
    }
}
