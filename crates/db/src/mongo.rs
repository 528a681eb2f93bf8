//! MongoDB backend.
//!
//! Holds one lazily-initialized [`Database`] handle for the whole process.
//! Initialization parses the URI, pings the server and creates the declared
//! unique indexes. A failed attempt leaves the cell empty so the next request
//! tries again.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::OnceCell;

use crate::config::StoreConfig;
use crate::store::{DocumentStore, StoreError, StoreResult, UniqueIndex};

/// Server error code for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoStore {
    config: StoreConfig,
    indexes: Vec<UniqueIndex>,
    database: OnceCell<Database>,
}

impl MongoStore {
    pub fn new(config: StoreConfig, indexes: Vec<UniqueIndex>) -> Self {
        Self {
            config,
            indexes,
            database: OnceCell::new(),
        }
    }

    /// Return the shared database handle, connecting on first use.
    pub async fn connect(&self) -> StoreResult<&Database> {
        self.database.get_or_try_init(|| self.initialize()).await
    }

    async fn initialize(&self) -> StoreResult<Database> {
        let uri = self
            .config
            .uri
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("MONGODB_URI is not set".into()))?;

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        options.server_selection_timeout = Some(self.config.server_selection_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client =
            Client::with_options(options).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let database = client.database(&self.config.database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tracing::info!(database = %self.config.database, "Connected to document store");

        for index in &self.indexes {
            let mut keys = Document::new();
            keys.insert(index.field, 1);
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            database
                .collection::<Document>(index.collection)
                .create_index(model)
                .await
                .map_err(classify)?;
            tracing::debug!(
                collection = index.collection,
                field = index.field,
                "Ensured unique index"
            );
        }

        Ok(database)
    }

    async fn collection(&self, name: &str) -> StoreResult<Collection<Document>> {
        Ok(self.connect().await?.collection::<Document>(name))
    }
}

/// Translate a driver error into the store taxonomy.
fn classify(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreError::DuplicateKey(write_error.message.clone())
        }
        ErrorKind::ServerSelection { .. } => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.connect()
            .await?
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn find_all(&self, collection: &str, sort_field: &str) -> StoreResult<Vec<Document>> {
        let mut sort = Document::new();
        sort.insert(sort_field, -1);
        self.collection(collection)
            .await?
            .find(doc! {})
            .sort(sort)
            .await
            .map_err(classify)?
            .try_collect()
            .await
            .map_err(classify)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>> {
        self.collection(collection)
            .await?
            .find_one(doc! { "_id": id })
            .await
            .map_err(classify)
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> StoreResult<ObjectId> {
        let result = self
            .collection(collection)
            .await?
            .insert_one(doc)
            .await
            .map_err(classify)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("store assigned a non-ObjectId identifier".into()))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        set: Document,
    ) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .await?
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await
            .map_err(classify)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .await?
            .delete_one(doc! { "_id": id })
            .await
            .map_err(classify)?;
        Ok(result.deleted_count > 0)
    }
}
