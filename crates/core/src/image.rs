//! Image normalizer.
//!
//! Uploaded project and client images are decoded, resized to a fixed
//! resolution per resource kind and re-encoded as PNG. The aspect ratio of the
//! input is not preserved: the output is always exactly the target size.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// File extensions accepted for multipart uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// MIME prefix of the inline data-URIs produced by [`to_data_uri`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// The resource an image belongs to, which fixes its target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Project,
    Client,
}

impl ImageKind {
    /// Target `(width, height)` in pixels.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            ImageKind::Project => (450, 350),
            ImageKind::Client => (150, 150),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The upload's filename is missing or has an unsupported extension.
    #[error("Invalid image file")]
    InvalidFile,

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Encode(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<ImageError> for CoreError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidFile => CoreError::Validation(ImageError::InvalidFile.to_string()),
            ImageError::Decode(msg) => CoreError::ImageDecode(msg),
            ImageError::Encode(msg) => CoreError::Internal(format!("PNG encoding failed: {msg}")),
            ImageError::Unavailable(detail) => CoreError::Unavailable {
                capability: "Image processing",
                detail,
            },
        }
    }
}

/// Raw image input as it arrives in a request.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A multipart file part.
    Upload { filename: String, bytes: Vec<u8> },
    /// A base64 string, optionally carrying a `data:...;base64,` header.
    DataUri(String),
}

impl ImageSource {
    /// Validate the source and return the encoded image bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, ImageError> {
        match self {
            ImageSource::Upload { filename, bytes } => {
                if !has_allowed_extension(&filename) {
                    return Err(ImageError::InvalidFile);
                }
                Ok(bytes)
            }
            ImageSource::DataUri(data) => decode_data_uri(&data),
        }
    }
}

/// Whether `filename` ends in one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode a base64 payload, stripping a leading `data:<mime>;base64,` header
/// if present.
pub fn decode_data_uri(input: &str) -> Result<Vec<u8>, ImageError> {
    let trimmed = input.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((_, data)) => data,
            None => return Err(ImageError::Decode("data URI has no payload".into())),
        },
        None => trimmed,
    };
    STANDARD
        .decode(payload)
        .map_err(|e| ImageError::Decode(format!("invalid base64 image: {e}")))
}

/// Decode `bytes`, resize to the exact target size for `kind` with a Lanczos
/// filter and re-encode as PNG.
#[cfg(feature = "imaging")]
pub fn normalize(bytes: &[u8], kind: ImageKind) -> Result<Vec<u8>, ImageError> {
    use std::io::Cursor;

    use image::imageops::FilterType;
    use image::{DynamicImage, ImageFormat};

    let (width, height) = kind.dimensions();
    let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let resized = decoded.resize_exact(width, height, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(resized.to_rgba8())
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(not(feature = "imaging"))]
pub fn normalize(_bytes: &[u8], _kind: ImageKind) -> Result<Vec<u8>, ImageError> {
    Err(ImageError::Unavailable(
        "built without the `imaging` feature".into(),
    ))
}

/// Wrap PNG bytes in an inline data-URI.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png))
}
