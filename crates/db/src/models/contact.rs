use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A contact-form submission from the `contacts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub city: String,
}
