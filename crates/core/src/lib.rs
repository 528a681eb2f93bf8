//! Domain building blocks shared by the store and HTTP layers: the error
//! taxonomy, common types, required-field validation and the image
//! normalizer.

pub mod error;
pub mod image;
pub mod types;
pub mod validation;
