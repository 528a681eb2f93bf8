//! In-process [`DocumentStore`] backend.
//!
//! Keeps each collection as an insertion-ordered list of documents behind a
//! `RwLock` and enforces the same unique indexes as the MongoDB backend.
//! Used by the test suites and for running the server without a database.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use atelier_core::types::ID_FIELD;

use crate::store::{DocumentStore, StoreError, StoreResult, UniqueIndex};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    indexes: Vec<UniqueIndex>,
}

impl MemoryStore {
    pub fn new(indexes: Vec<UniqueIndex>) -> Self {
        Self {
            collections: RwLock::default(),
            indexes,
        }
    }

    /// Fail if `candidate` would collide with another document on a unique
    /// field. `skip` excludes the document being updated.
    fn check_unique(
        &self,
        collection: &str,
        docs: &[Document],
        candidate: &Document,
        skip: Option<ObjectId>,
    ) -> StoreResult<()> {
        for index in self.indexes.iter().filter(|i| i.collection == collection) {
            let Some(value) = candidate.get(index.field) else {
                continue;
            };
            let clash = docs.iter().any(|existing| {
                existing.get_object_id(ID_FIELD).ok() != skip
                    && existing.get(index.field) == Some(value)
            });
            if clash {
                return Err(StoreError::DuplicateKey(format!(
                    "{collection}.{} already contains {value}",
                    index.field
                )));
            }
        }
        Ok(())
    }
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::DateTime(a)), Some(Bson::DateTime(b))) => a.cmp(b),
        (Some(Bson::Int32(a)), Some(Bson::Int32(b))) => a.cmp(b),
        (Some(Bson::Int64(a)), Some(Bson::Int64(b))) => a.cmp(b),
        (Some(Bson::Double(a)), Some(Bson::Double(b))) => a.total_cmp(b),
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn has_id(doc: &Document, id: ObjectId) -> bool {
    doc.get_object_id(ID_FIELD).is_ok_and(|doc_id| doc_id == id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_all(&self, collection: &str, sort_field: &str) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs = collections.get(collection).cloned().unwrap_or_default();
        docs.sort_by(|a, b| compare(b.get(sort_field), a.get(sort_field)));
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> StoreResult<ObjectId> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        self.check_unique(collection, docs, &doc, None)?;

        let id = ObjectId::new();
        let mut stored = Document::new();
        stored.insert(ID_FIELD, id);
        doc.remove(ID_FIELD);
        for (key, value) in doc {
            stored.insert(key, value);
        }
        docs.push(stored);
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        set: Document,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(position) = docs.iter().position(|d| has_id(d, id)) else {
            return Ok(false);
        };

        let mut updated = docs[position].clone();
        for (key, value) in set {
            updated.insert(key, value);
        }
        self.check_unique(collection, docs, &updated, Some(id))?;
        docs[position] = updated;
        Ok(true)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(docs.len() < before)
    }
}
