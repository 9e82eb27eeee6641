use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use formsync_core::model::{
    ErrorBody, RuleViolationBody, ValidationError, LANGUAGE_NOT_FOUND, MODEL_NOT_FOUND,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("model not found")]
    ModelNotFound,
    #[error("language not found")]
    LanguageNotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed for '{model}'")]
    RuleViolations {
        model: String,
        errors: Vec<ValidationError>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ModelNotFound => error_body(StatusCode::BAD_REQUEST, MODEL_NOT_FOUND),
            ApiError::LanguageNotFound => error_body(StatusCode::BAD_REQUEST, LANGUAGE_NOT_FOUND),
            ApiError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, &msg),
            ApiError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, &msg),
            ApiError::RuleViolations { model, errors } => {
                let body =
                    RuleViolationBody::group(&model, &errors, chrono::Utc::now().to_rfc3339());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
    };
    (status, Json(body)).into_response()
}
