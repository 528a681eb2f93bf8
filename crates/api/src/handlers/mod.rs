//! Request handlers, one module per collection.
//!
//! Each submodule provides async handler functions (list, get_by_id, create,
//! update, delete as the collection supports them). Handlers delegate to the
//! corresponding repository in `atelier_db` and map errors via
//! [`crate::error::AppError`].

pub mod client;
pub mod contact;
pub mod newsletter;
pub mod project;

use crate::state::AppState;

/// Remove an image stored for a write that did not land.
async fn discard_image(state: &AppState, image: Option<&str>) {
    if let Some(reference) = image {
        state.config.image_storage.discard(reference).await;
    }
}
