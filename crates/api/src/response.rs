//! Shared response helpers for API handlers.
//!
//! Documents leave the API through [`mapped`], which runs them through the
//! document mapper so identifiers and timestamps are JSON-safe strings.

use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;

/// Serialize a model (or a list of models) as mapped JSON.
pub fn mapped<T: Serialize>(value: &T) -> AppResult<Json<Value>> {
    Ok(Json(atelier_db::mapper::document_to_json(value)?))
}

/// `{ "message": ... }` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
