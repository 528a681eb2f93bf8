//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&dyn DocumentStore` as the first argument.

pub mod client_repo;
pub mod contact_repo;
pub mod newsletter_repo;
pub mod project_repo;

pub use client_repo::ClientRepo;
pub use contact_repo::ContactRepo;
pub use newsletter_repo::NewsletterRepo;
pub use project_repo::ProjectRepo;

use bson::Document;
use serde::de::DeserializeOwned;

use crate::store::{StoreError, StoreResult, UniqueIndex};

/// Unique indexes the store must maintain.
pub fn unique_indexes() -> Vec<UniqueIndex> {
    vec![NewsletterRepo::EMAIL_INDEX]
}

/// Decode a stored document into its model.
fn decode<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    bson::from_document(doc).map_err(|e| StoreError::Mapping(e.to_string()))
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> StoreResult<Vec<T>> {
    docs.into_iter().map(decode).collect()
}

/// Stage `value` under `key` if it was provided.
fn stage(set: &mut Document, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        set.insert(key, v.as_str());
    }
}
