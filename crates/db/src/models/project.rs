//! Project entity model and DTOs.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A document from the `projects` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    /// Inline data-URI or `/uploads/...` path of the normalized image.
    pub image: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

/// DTO for creating a new project. The image is already normalized.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// DTO for updating an existing project. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}
