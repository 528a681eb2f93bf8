//! Repository for the `contacts` collection. Contacts are write-once.

use bson::doc;
use bson::oid::ObjectId;

use atelier_core::types::CREATED_AT_FIELD;

use super::decode_all;
use crate::models::contact::{Contact, CreateContact};
use crate::store::{DocumentStore, StoreResult};

pub struct ContactRepo;

impl ContactRepo {
    pub const COLLECTION: &'static str = "contacts";

    pub async fn create(store: &dyn DocumentStore, input: &CreateContact) -> StoreResult<Contact> {
        let created_at = bson::DateTime::now();
        let doc = doc! {
            "name": input.name.as_str(),
            "email": input.email.as_str(),
            "mobile": input.mobile.as_str(),
            "city": input.city.as_str(),
            CREATED_AT_FIELD: created_at,
        };
        let id = store.insert_one(Self::COLLECTION, doc).await?;
        Ok(Contact {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            mobile: input.mobile.clone(),
            city: input.city.clone(),
            created_at,
        })
    }

    pub async fn list(store: &dyn DocumentStore) -> StoreResult<Vec<Contact>> {
        decode_all(store.find_all(Self::COLLECTION, CREATED_AT_FIELD).await?)
    }

    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<bool> {
        store.delete_by_id(Self::COLLECTION, id).await
    }
}
