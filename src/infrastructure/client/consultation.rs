use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    api_errors::ApiError,
    constants::{LOCAL_CONSULTATION_PATH, PRODUCTION_CONSULTATION_ENDPOINT},
    entities::consultation::ConsultationRequest,
    settings::{AppConfig, AppEnvironment},
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Resolves where consultation requests are posted for the given environment.
pub fn consultation_endpoint(env: &AppEnvironment, local_base_url: &str) -> Result<Url, url::ParseError> {
    match env {
        AppEnvironment::Production => Url::parse(PRODUCTION_CONSULTATION_ENDPOINT),
        _ => Url::parse(local_base_url)?.join(LOCAL_CONSULTATION_PATH),
    }
}

/// Posts consultation forms to the API. One attempt per call, no retries.
#[derive(Clone, Debug)]
pub struct ConsultationClient {
    http: Client,
    endpoint: Url,
}

impl ConsultationClient {
    pub fn new(endpoint: Url) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let endpoint = consultation_endpoint(&config.env, &config.local_api_base_url)?;
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit_consultation(&self, data: &ConsultationRequest) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            return Err(ApiError::server(status.as_u16(), message));
        }

        let result: SubmissionBody = response.json().await?;
        if !result.success {
            return Err(ApiError::rejected(result.error));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_targets_absolute_api_url() {
        let url = consultation_endpoint(&AppEnvironment::Production, "http://localhost:3000").unwrap();
        assert_eq!(url.as_str(), PRODUCTION_CONSULTATION_ENDPOINT);
    }

    #[test]
    fn development_resolves_relative_path_against_local_base() {
        let url = consultation_endpoint(&AppEnvironment::Development, "http://localhost:3000/app/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/submit-consultation");
    }

    #[test]
    fn invalid_local_base_is_reported() {
        assert!(consultation_endpoint(&AppEnvironment::Testing, "not a url").is_err());
    }
}
