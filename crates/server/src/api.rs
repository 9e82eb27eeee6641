use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use formsync_core::model::{User, UserDraft, ValidationError, ValidationOutcome};
use formsync_core::registry::Registry;
use formsync_core::rules::DEFAULT_LANG;
use formsync_core::validate_model;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub store: Arc<UserStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/validate/{name}", post(validate))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", delete(delete_user))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct LangQuery {
    #[serde(default)]
    lang: String,
}

async fn validate(
    State(st): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<LangQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ValidationError>>, ApiError> {
    match validate_model(&st.registry, &name, &body, &query.lang) {
        ValidationOutcome::Errors(errors) => Ok(Json(errors)),
        ValidationOutcome::ModelNotFound => Err(ApiError::ModelNotFound),
        ValidationOutcome::LanguageNotFound => Err(ApiError::LanguageNotFound),
    }
}

async fn create_user(
    State(st): State<AppState>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    match validate_model(&st.registry, "user", &body, DEFAULT_LANG) {
        ValidationOutcome::Errors(errors) if errors.is_empty() => {}
        ValidationOutcome::Errors(errors) => {
            return Err(ApiError::RuleViolations {
                model: "user".to_string(),
                errors,
            })
        }
        ValidationOutcome::ModelNotFound => return Err(ApiError::ModelNotFound),
        ValidationOutcome::LanguageNotFound => return Err(ApiError::LanguageNotFound),
    }

    let draft: UserDraft =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: draft.username,
        email: draft.email,
        age: draft.age,
        interests: draft.interests,
    };
    info!(id = %user.id, username = %user.username, "user created");
    st.store.insert(user).await;
    Ok(StatusCode::CREATED)
}

async fn list_users(State(st): State<AppState>) -> Json<Vec<User>> {
    Json(st.store.list().await)
}

async fn delete_user(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !st.store.remove(&id).await {
        return Err(ApiError::NotFound(format!(
            "there is no 'user' with the id '{id}'"
        )));
    }
    info!(%id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
