//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use atelier_core::error::CoreError;
use atelier_core::image::ImageKind;
use atelier_core::validation::{optional_non_empty, require_all};
use atelier_db::models::project::{CreateProject, UpdateProject};
use atelier_db::repositories::ProjectRepo;

use super::discard_image;
use crate::error::{AppError, AppResult};
use crate::extract::{parse_object_id, ResourceForm};
use crate::response::{mapped, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Project";

fn not_found() -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY })
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let projects = ProjectRepo::list(state.store()).await?;
    mapped(&projects)
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id, ENTITY)?;
    let project = ProjectRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;
    mapped(&project)
}

/// POST /api/projects
///
/// Requires `image`, `name` and `description`. The image is resized to
/// 450x350 before the project is stored.
pub async fn create(
    State(state): State<AppState>,
    form: ResourceForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let ResourceForm { fields, image } = form;
    let image = image.ok_or_else(|| CoreError::Validation("Image is required".into()))?;

    let [name, description] = require_all(
        [
            fields.get("name").map(String::as_str),
            fields.get("description").map(String::as_str),
        ],
        "Name and description are required",
    )?;

    let image = state
        .config
        .image_storage
        .store(image, ImageKind::Project)
        .await?;

    let input = CreateProject {
        name,
        description,
        image,
    };
    let project = match ProjectRepo::create(state.store(), &input).await {
        Ok(project) => project,
        Err(e) => {
            discard_image(&state, Some(&input.image)).await;
            return Err(e.into());
        }
    };
    tracing::info!(id = %project.id, "Created project");

    Ok((StatusCode::CREATED, mapped(&project)?))
}

/// PUT /api/projects/{id}
///
/// Partial update: only the fields present in the request are changed. A
/// replaced image file is removed once the new one is stored.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: ResourceForm,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id, ENTITY)?;
    let existing = ProjectRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;

    let name = optional_non_empty("name", form.take("name"))?;
    let description = optional_non_empty("description", form.take("description"))?;
    let image = match form.image {
        Some(source) => Some(
            state
                .config
                .image_storage
                .store(source, ImageKind::Project)
                .await?,
        ),
        None => None,
    };

    let input = UpdateProject {
        name,
        description,
        image,
    };
    match ProjectRepo::update(state.store(), id, &input).await {
        Ok(Some(project)) => {
            if input.image.is_some() {
                discard_image(&state, Some(&existing.image)).await;
            }
            mapped(&project)
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

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_object_id(&id, ENTITY)?;
    let existing = ProjectRepo::find_by_id(state.store(), id)
        .await?
        .ok_or_else(not_found)?;
    if !ProjectRepo::delete(state.store(), id).await? {
        return Err(not_found());
    }
    discard_image(&state, Some(&existing.image)).await;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
