#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Invalid {entity} id")]
    InvalidId { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Image could not be decoded: {0}")]
    ImageDecode(String),

    /// A capability the request depends on (the store, image processing) is
    /// not configured or not reachable.
    #[error("{capability} unavailable: {detail}")]
    Unavailable {
        capability: &'static str,
        detail: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
