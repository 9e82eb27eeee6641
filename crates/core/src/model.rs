use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field-level validation failure, relating a field name to one
/// human-readable error description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub description: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// Terminal outcome of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The model resolved and every declared rule ran. An empty list is
    /// the success case, distinct from the not-found outcomes.
    Errors(Vec<ValidationError>),
    ModelNotFound,
    LanguageNotFound,
}

/// Wire message for the "model not found" outcome.
pub const MODEL_NOT_FOUND: &str = "model not found";
/// Wire message for the "language not found" outcome.
pub const LANGUAGE_NOT_FOUND: &str = "language not found";

/// Generic error body for 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a 400 response when a write operation fails validation.
/// Errors are grouped by model display name, then by field, keeping the
/// encounter order of descriptions within a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolationBody {
    pub status_code: u16,
    pub timestamp: String,
    pub validation_errors: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl RuleViolationBody {
    pub fn group(display_name: &str, errors: &[ValidationError], timestamp: String) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for err in errors {
            fields
                .entry(err.field.clone())
                .or_default()
                .push(err.description.clone());
        }
        let mut validation_errors = BTreeMap::new();
        validation_errors.insert(display_name.to_string(), fields);
        Self {
            status_code: 400,
            timestamp,
            validation_errors,
        }
    }
}

/// A stored user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub age: i64,
    pub interests: Vec<String>,
}

/// User payload before an id has been assigned. Only deserialized after
/// the raw body passed model validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub age: i64,
    pub interests: Vec<String>,
}
