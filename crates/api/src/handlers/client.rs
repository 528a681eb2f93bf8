//! Handlers for the `/clients` resource.
//!
//! Same shape as projects with an extra `designation` field; images are
//! normalized to 150x150.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use atelier_core::error::CoreError;
use atelier_core::image::ImageKind;
use atelier_core::validation::{optional_non_empty, require_all};
use atelier_db::models::client::{CreateClient, UpdateClient};
use atelier_db::repositories::ClientRepo;

use super::discard_image;
use crate::error::{AppError, AppResult};
use crate::extract::{parse_object_id, ResourceForm};
use crate::response::{mapped, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Client";

fn not_found() -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY })
}

/// GET /api/clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let clients = ClientRepo::list(state.store()).await?;
    mapped(&clients)
}

/// GET /api/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id, ENTITY)?;
    let client = ClientRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;
    mapped(&client)
}

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    mut form: ResourceForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let image = form
        .image
        .take()
        .ok_or_else(|| CoreError::Validation("Image is required".into()))?;

    let [name, description, designation] = require_all(
        [
            form.text("name"),
            form.text("description"),
            form.text("designation"),
        ],
        "Name, description, and designation are required",
    )?;

    let image = state
        .config
        .image_storage
        .store(image, ImageKind::Client)
        .await?;

    let input = CreateClient {
        name,
        description,
        designation,
        image,
    };
    let client = match ClientRepo::create(state.store(), &input).await {
        Ok(client) => client,
        Err(e) => {
            discard_image(&state, Some(&input.image)).await;
            return Err(e.into());
        }
    };
    tracing::info!(id = %client.id, "Created client");

    Ok((StatusCode::CREATED, mapped(&client)?))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: ResourceForm,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id, ENTITY)?;
    let existing = ClientRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;

    let input = UpdateClient {
        name: optional_non_empty("name", form.take("name"))?,
        description: optional_non_empty("description", form.take("description"))?,
        designation: optional_non_empty("designation", form.take("designation"))?,
        image: match form.image {
            Some(source) => Some(
                state
                    .config
                    .image_storage
                    .store(source, ImageKind::Client)
                    .await?,
            ),
            None => None,
        },
    };

    match ClientRepo::update(state.store(), id, &input).await {
        Ok(Some(client)) => {
            if input.image.is_some() {
                discard_image(&state, Some(&existing.image)).await;
            }
            mapped(&client)
        }
        Ok(None) => {
            discard_image(&state, input.image.as_deref()).await;
            Err(not_found())
        }
        Err(e) => {
            discard_image(&state, input.image.as_deref()).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id, ENTITY)?;
    let existing = ClientRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;
    if !ClientRepo::delete(state.store(), id).await? {
        return Err(not_found());
    }
    discard_image(&state, Some(&existing.image)).await;
    Ok(Json(MessageResponse::new("Client deleted successfully")))
}
