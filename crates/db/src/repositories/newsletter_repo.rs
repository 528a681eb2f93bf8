//! Repository for the `newsletters` collection.
//!
//! Email uniqueness is enforced by [`NewsletterRepo::EMAIL_INDEX`]; a repeated
//! subscription surfaces as [`crate::StoreError::DuplicateKey`] from
//! [`NewsletterRepo::subscribe`].

use bson::doc;
use bson::oid::ObjectId;

use atelier_core::types::CREATED_AT_FIELD;

use super::decode_all;
use crate::models::newsletter::Subscription;
use crate::store::{DocumentStore, StoreResult, UniqueIndex};

pub struct NewsletterRepo;

impl NewsletterRepo {
    pub const COLLECTION: &'static str = "newsletters";

    pub const EMAIL_INDEX: UniqueIndex = UniqueIndex {
        collection: Self::COLLECTION,
        field: "email",
    };

    pub async fn subscribe(store: &dyn DocumentStore, email: &str) -> StoreResult<Subscription> {
        let created_at = bson::DateTime::now();
        let doc = doc! {
            "email": email,
            CREATED_AT_FIELD: created_at,
        };
        let id = store.insert_one(Self::COLLECTION, doc).await?;
        Ok(Subscription {
            id,
            email: email.to_string(),
            created_at,
        })
    }

    pub async fn list(store: &dyn DocumentStore) -> StoreResult<Vec<Subscription>> {
        decode_all(store.find_all(Self::COLLECTION, CREATED_AT_FIELD).await?)
    }

    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> StoreResult<bool> {
        store.delete_by_id(Self::COLLECTION, id).await
    }
}
