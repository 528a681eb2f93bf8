//! The document-store seam.
//!
//! Repositories talk to collections through [`DocumentStore`] only, so the
//! same handlers run against MongoDB in production and [`crate::MemoryStore`]
//! in tests.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is not configured or cannot be reached.
    #[error("{0}")]
    Unavailable(String),

    /// A write violated a unique index.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("{0}")]
    Backend(String),

    /// A stored document did not match the expected model shape.
    #[error("Malformed document: {0}")]
    Mapping(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single-field unique index declared by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueIndex {
    pub collection: &'static str,
    pub field: &'static str,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trip to the store, establishing the connection if needed.
    async fn ping(&self) -> StoreResult<()>;

    /// Every document in `collection`, sorted by `sort_field` descending.
    async fn find_all(&self, collection: &str, sort_field: &str) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>>;

    /// Insert `doc` and return the identifier the store assigned to it.
    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<ObjectId>;

    /// Overwrite the fields in `set` on the document with `id`.
    ///
    /// Returns `false` if no document matched. Fields not in `set` are kept.
    async fn update_by_id(&self, collection: &str, id: ObjectId, set: Document)
        -> StoreResult<bool>;

    /// Returns `true` if a document was removed.
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<bool>;
}
