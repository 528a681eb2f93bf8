/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stored field holding the server-assigned creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Stored field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";
