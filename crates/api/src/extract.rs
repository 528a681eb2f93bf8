//! Request extractors that turn malformed input into [`AppError`]s.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use bson::oid::ObjectId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use atelier_core::error::CoreError;
use atelier_core::image::ImageSource;

use crate::error::AppError;

/// Name of the form field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Parse a path identifier, reporting a malformed one as 400 rather than 404.
pub fn parse_object_id(raw: &str, entity: &'static str) -> Result<ObjectId, CoreError> {
    ObjectId::parse_str(raw).map_err(|_| CoreError::InvalidId { entity })
}

/// Text form of a JSON scalar. `null` is absent; arrays and objects are
/// handed back as the error.
fn scalar_text(value: Value) -> Result<Option<String>, Value> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(other),
    }
}

/// `deserialize_with` helper for optional text fields that also accepts
/// numbers and booleans, e.g. a `mobile` sent as `123`. Pair it with
/// `#[serde(default)]`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    scalar_text(value).map_err(|_| D::Error::custom("expected a string"))
}

/// An unselected file input arrives as an empty string or as a data-URI
/// with no payload (`data:application/octet-stream;base64,`).
fn is_empty_image(text: &str) -> bool {
    let trimmed = text.trim();
    match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .is_some_and(|(_, payload)| payload.trim().is_empty()),
        None => trimmed.is_empty(),
    }
}

/// JSON body extractor whose rejections render as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Text fields and an optional image, from either encoding the project and
/// client endpoints accept:
///
/// - `multipart/form-data` with an `image` file part and text parts;
/// - a JSON object whose `image` member is a base64 string or data-URI.
///
/// An empty body yields an empty form.
#[derive(Debug, Default)]
pub struct ResourceForm {
    pub fields: HashMap<String, String>,
    pub image: Option<ImageSource>,
}

impl ResourceForm {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn take(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ResourceForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(str::to_string);

            match (name.as_str(), file_name) {
                (IMAGE_FIELD, Some(filename)) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                    // An unselected file input arrives as an empty, unnamed part.
                    if !(filename.is_empty() && bytes.is_empty()) {
                        form.image = Some(ImageSource::Upload {
                            filename,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                (IMAGE_FIELD, None) => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                    if !is_empty_image(&text) {
                        form.image = Some(ImageSource::DataUri(text));
                    }
                }
                (_, _) => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let mut form = ResourceForm::default();
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(form);
        }

        let object: serde_json::Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

        for (key, value) in object {
            let text = match scalar_text(value) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(_) => {
                    return Err(AppError::BadRequest(format!("Field '{key}' must be a string")));
                }
            };
            if key == IMAGE_FIELD {
                if !is_empty_image(&text) {
                    form.image = Some(ImageSource::DataUri(text));
                }
            } else {
                form.fields.insert(key, text);
            }
        }

        Ok(form)
    }
}

impl<S> FromRequest<S> for ResourceForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
            Self::from_json(&body)
        }
    }
}
