//! Storage of normalized images.
//!
//! The normalizer itself lives in [`atelier_core::image`]; this module runs it
//! off the async runtime and decides what reference ends up in the document.

use std::path::{Path, PathBuf};

use atelier_core::error::CoreError;
use atelier_core::image::{self, ImageKind, ImageSource};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// URL prefix under which disk-stored images are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Where normalized images are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStorage {
    /// Embed the PNG in the document as a `data:` URI.
    Inline,
    /// Write the PNG into `upload_dir` and store its `/uploads/...` path.
    Disk { upload_dir: PathBuf },
}

impl ImageStorage {
    /// Normalize `source` for `kind` and return the reference to persist.
    pub async fn store(&self, source: ImageSource, kind: ImageKind) -> AppResult<String> {
        let png = tokio::task::spawn_blocking(move || {
            let bytes = source.into_bytes()?;
            image::normalize(&bytes, kind)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Image task failed: {e}")))?
        .map_err(CoreError::from)?;

        match self {
            ImageStorage::Inline => Ok(image::to_data_uri(&png)),
            ImageStorage::Disk { upload_dir } => write_upload(upload_dir, &png).await,
        }
    }

    /// Remove an image previously returned by [`ImageStorage::store`].
    ///
    /// Inline data-URIs and references outside `/uploads` are left alone. A
    /// file that cannot be removed is logged, not reported.
    pub async fn discard(&self, reference: &str) {
        let ImageStorage::Disk { upload_dir } = self else {
            return;
        };
        let Some(file_name) = reference
            .strip_prefix(UPLOADS_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        if file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(|c: char| c == '/' || c == '\\')
        {
            return;
        }

        let path = upload_dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed stored image"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored image"),
        }
    }

    /// The upload directory, if images are stored on disk.
    pub fn upload_dir(&self) -> Option<&Path> {
        match self {
            ImageStorage::Inline => None,
            ImageStorage::Disk { upload_dir } => Some(upload_dir),
        }
    }
}

/// Write `png` under a fresh name via a temporary file, returning the public
/// path. The temporary file never survives a failed write.
async fn write_upload(dir: &Path, png: &[u8]) -> AppResult<String> {
    let file_name = format!("cropped-{}.png", Uuid::new_v4());
    let target = dir.join(&file_name);
    let temp = dir.join(format!("{file_name}.part"));

    let written = match tokio::fs::write(&temp, png).await {
        Ok(()) => tokio::fs::rename(&temp, &target).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(AppError::InternalError(format!(
            "Failed to store image in {}: {e}",
            dir.display()
        )));
    }

    tracing::debug!(path = %target.display(), bytes = png.len(), "Stored normalized image");
    Ok(format!("{UPLOADS_ROUTE}/{file_name}"))
}
