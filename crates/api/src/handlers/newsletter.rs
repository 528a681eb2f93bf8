//! Handlers for the `/newsletters` resource (email subscriptions).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use atelier_core::error::CoreError;
use atelier_core::validation::require_all;
use atelier_db::repositories::NewsletterRepo;
use atelier_db::StoreError;

use crate::error::{AppError, AppResult};
use crate::extract::{lenient_text, parse_object_id, JsonBody};
use crate::response::{mapped, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Subscriber";

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
}

/// GET /api/newsletters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let subscriptions = NewsletterRepo::list(state.store()).await?;
    mapped(&subscriptions)
}

/// POST /api/newsletters
///
/// A repeated email hits the unique index on `email` and is reported as 400.
pub async fn subscribe(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let [email] = require_all([input.email.as_deref()], "Email is required")?;

    let subscription = NewsletterRepo::subscribe(state.store(), &email)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => {
                AppError::Core(CoreError::Conflict("Email already subscribed".into()))
            }
            other => AppError::Store(other),
        })?;
    Ok((StatusCode::CREATED, mapped(&subscription)?))
}

/// DELETE /api/newsletters/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id, ENTITY)?;
    if NewsletterRepo::delete(state.store(), id).await? {
        Ok(Json(MessageResponse::new("Subscriber deleted successfully")))
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY }))
    }
}
