use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A newsletter subscription from the `newsletters` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}
