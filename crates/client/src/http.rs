use anyhow::{Context, Result};
use formsync_core::model::{
    ErrorBody, ValidationError, ValidationOutcome, LANGUAGE_NOT_FOUND, MODEL_NOT_FOUND,
};
use reqwest::StatusCode;
use serde_json::Value;

use crate::validate::Validate;

/// Validator backed by the server's `POST /validate/{model}` endpoint.
#[derive(Clone)]
pub struct HttpValidator {
    base_url: String,
    client: reqwest::Client,
}

impl HttpValidator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

impl Validate for HttpValidator {
    async fn validate(&self, model: &str, value: &Value, lang: &str) -> Result<ValidationOutcome> {
        let mut request = self
            .client
            .post(format!("{}/validate/{}", self.base_url, model))
            .json(value);
        if !lang.is_empty() {
            request = request.query(&[("lang", lang)]);
        }

        let response = request.send().await.context("validation request")?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body: ErrorBody = response.json().await.context("error body decode")?;
            return match body.error.as_str() {
                MODEL_NOT_FOUND => Ok(ValidationOutcome::ModelNotFound),
                LANGUAGE_NOT_FOUND => Ok(ValidationOutcome::LanguageNotFound),
                other => Err(anyhow::anyhow!("unexpected validation failure: {other}")),
            };
        }

        let errors: Vec<ValidationError> = response
            .error_for_status()
            .context("validation status")?
            .json()
            .await
            .context("validation decode")?;
        Ok(ValidationOutcome::Errors(errors))
    }
}
