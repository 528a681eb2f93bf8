//! Document-store access: the [`DocumentStore`] trait with its MongoDB and
//! in-memory backends, the document mapper, entity models and repositories.

use std::sync::Arc;

pub mod config;
pub mod mapper;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repositories;
pub mod store;

pub use config::{ConnectMode, StoreBackend, StoreConfig};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{DocumentStore, StoreError, StoreResult, UniqueIndex};

/// Shared handle to the process-wide store.
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Build the store selected by `config`.
///
/// In eager mode the MongoDB connection is attempted right away; a failure is
/// logged and left for the lazy path to retry on the next request, so the
/// server still starts without a reachable database.
pub async fn open_store(config: StoreConfig) -> StoreHandle {
    let indexes = repositories::unique_indexes();

    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store, data is not persisted");
            Arc::new(MemoryStore::new(indexes))
        }
        StoreBackend::Mongo => {
            let connect = config.connect;
            let store = MongoStore::new(config, indexes);
            if connect == ConnectMode::Eager {
                if let Err(e) = store.connect().await {
                    tracing::warn!(error = %e, "Eager store connection failed, will retry on first use");
                }
            }
            Arc::new(store)
        }
    }
}

/// Verify the store is reachable.
pub async fn health_check(store: &dyn DocumentStore) -> StoreResult<()> {
    store.ping().await
}
