//! Repository for the `projects` collection.

use bson::oid::ObjectId;
use bson::{doc, Document};

use atelier_core::types::CREATED_AT_FIELD;

use super::{decode, decode_all, stage};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::store::{DocumentStore, StoreResult};

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    pub const COLLECTION: &'static str = "projects";

    /// Insert a new project stamped with the current time, returning the
    /// stored model.
    pub async fn create(store: &dyn DocumentStore, input: &CreateProject) -> StoreResult<Project> {
        let created_at = bson::DateTime::now();
        let doc = doc! {
            "name": input.name.as_str(),
            "description": input.description.as_str(),
            "image": input.image.as_str(),
            CREATED_AT_FIELD: created_at,
        };
        let id = store.insert_one(Self::COLLECTION, doc).await?;
        Ok(Project {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            image: input.image.clone(),
            created_at,
        })
    }

    /// List all projects, most recently created first.
    pub async fn list(store: &dyn DocumentStore) -> StoreResult<Vec<Project>> {
        decode_all(store.find_all(Self::COLLECTION, CREATED_AT_FIELD).await?)
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<Option<Project>> {
        store
            .find_by_id(Self::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no project with the given `id` exists.
    pub async fn update(
        store: &dyn DocumentStore,
        id: ObjectId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let mut set = Document::new();
        stage(&mut set, "name", &input.name);
        stage(&mut set, "description", &input.description);
        stage(&mut set, "image", &input.image);

        if !set.is_empty() && !store.update_by_id(Self::COLLECTION, id, set).await? {
            return Ok(None);
        }
        Self::find_by_id(store, id).await
    }

    /// Delete a project by ID. Returns `true` if a document was removed.
    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<bool> {
        store.delete_by_id(Self::COLLECTION, id).await
    }
}
