//! Handlers for the `/contacts` resource (contact-form submissions).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use atelier_core::error::CoreError;
use atelier_core::validation::require_all;
use atelier_db::models::contact::CreateContact;
use atelier_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{lenient_text, parse_object_id, JsonBody};
use crate::response::{mapped, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Contact";

/// Request body for `POST /api/contacts`. Every field is required; missing
/// ones are reported together.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
}

/// GET /api/contacts
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let contacts = ContactRepo::list(state.store()).await?;
    mapped(&contacts)
}

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ContactRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let [name, email, mobile, city] = require_all(
        [
            input.name.as_deref(),
            input.email.as_deref(),
            input.mobile.as_deref(),
            input.city.as_deref(),
        ],
        "All fields are required",
    )?;

    let contact = ContactRepo::create(
        state.store(),
        &CreateContact {
            name,
            email,
            mobile,
            city,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, mapped(&contact)?))
}

/// DELETE /api/contacts/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id, ENTITY)?;
    if ContactRepo::delete(state.store(), id).await? {
        Ok(Json(MessageResponse::new("Contact deleted successfully")))
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY }))
    }
}
