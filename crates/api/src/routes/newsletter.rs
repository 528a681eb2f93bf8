use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::newsletter;
use crate::state::AppState;

/// Routes mounted at `/newsletters`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> subscribe
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(newsletter::list).post(newsletter::subscribe))
        .route("/{id}", delete(newsletter::delete))
}
