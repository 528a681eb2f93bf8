pub mod client;
pub mod contact;
pub mod health;
pub mod newsletter;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                 list, create
/// /projects/{id}            get, update, delete
///
/// /clients                  list, create
/// /clients/{id}             get, update, delete
///
/// /contacts                 list, create
/// /contacts/{id}            delete
///
/// /newsletters              list, subscribe
/// /newsletters/{id}         delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/clients", client::router())
        .nest("/contacts", contact::router())
        .nest("/newsletters", newsletter::router())
}
