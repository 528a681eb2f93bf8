use std::sync::Arc;

use atelier_db::{DocumentStore, StoreHandle};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The process-wide document store, connected on first use.
    pub store: StoreHandle,
    /// Server configuration (image storage mode, limits).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: StoreHandle, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
