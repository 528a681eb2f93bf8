//! Entity models and DTOs.
//!
//! Models mirror the stored documents: `_id` is the store-native
//! [`bson::oid::ObjectId`] and `createdAt` the store-native datetime. They are
//! passed through [`crate::mapper`] before leaving the API.

pub mod client;
pub mod contact;
pub mod newsletter;
pub mod project;
