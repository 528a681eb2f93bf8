//! Repository for the `clients` collection.

use bson::oid::ObjectId;
use bson::{doc, Document};

use atelier_core::types::CREATED_AT_FIELD;

use super::{decode, decode_all, stage};
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::store::{DocumentStore, StoreResult};

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    pub const COLLECTION: &'static str = "clients";

    pub async fn create(store: &dyn DocumentStore, input: &CreateClient) -> StoreResult<Client> {
        let created_at = bson::DateTime::now();
        let doc = doc! {
            "name": input.name.as_str(),
            "description": input.description.as_str(),
            "designation": input.designation.as_str(),
            "image": input.image.as_str(),
            CREATED_AT_FIELD: created_at,
        };
        let id = store.insert_one(Self::COLLECTION, doc).await?;
        Ok(Client {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            designation: input.designation.clone(),
            image: input.image.clone(),
            created_at,
        })
    }

    pub async fn list(store: &dyn DocumentStore) -> StoreResult<Vec<Client>> {
        decode_all(store.find_all(Self::COLLECTION, CREATED_AT_FIELD).await?)
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<Option<Client>> {
        store
            .find_by_id(Self::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Apply the provided fields and return the updated client, or `None` if
    /// it does not exist.
    pub async fn update(
        store: &dyn DocumentStore,
        id: ObjectId,
        input: &UpdateClient,
    ) -> StoreResult<Option<Client>> {
        let mut set = Document::new();
        stage(&mut set, "name", &input.name);
        stage(&mut set, "description", &input.description);
        stage(&mut set, "designation", &input.designation);
        stage(&mut set, "image", &input.image);

        if !set.is_empty() && !store.update_by_id(Self::COLLECTION, id, set).await? {
            return Ok(None);
        }
        Self::find_by_id(store, id).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<bool> {
        store.delete_by_id(Self::COLLECTION, id).await
    }
}
