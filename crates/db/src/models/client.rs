//! Client (testimonial) entity model and DTOs.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A document from the `clients` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub designation: String,
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone)]
pub struct CreateClient {
    pub name: String,
    pub description: String,
    pub designation: String,
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub description: Option<String>,
    pub designation: Option<String>,
    pub image: Option<String>,
}
