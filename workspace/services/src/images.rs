//! Image upload validation and storage.
//!
//! Uploaded pictures end up as plain files in the upload directory and rows
//! only keep the file name. Stored names are `<uuid>_<sanitized original>`
//! so two uploads of `car.png` never overwrite each other.

use std::path::Path;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, ServiceError};

/// File extensions accepted for car and profile pictures.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// A file received from a multipart form.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    /// File name as sent by the browser.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Browsers send an empty, unnamed part when no file was chosen.
    pub fn is_supplied(&self) -> bool {
        !self.filename.trim().is_empty()
    }
}

/// Lower-cased extension after the last dot, if any.
fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether the file name carries one of the [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client supplied file name to a safe, flat ASCII name.
///
/// Directory components are dropped, whitespace runs become `_`, everything
/// outside `[A-Za-z0-9._-]` is removed and leading/trailing dots and
/// underscores are trimmed. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let flat = filename.replace(['/', '\\'], " ");
    let joined = flat.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Collision-free file name to store an accepted upload under.
fn stored_filename(original: &str) -> String {
    let id = Uuid::new_v4().simple();
    let sanitized = secure_filename(original);
    if allowed_file(&sanitized) {
        format!("{}_{}", id, sanitized)
    } else {
        // Sanitizing ate the extension (e.g. a fully non-ASCII name).
        let ext = extension(original).unwrap_or_default();
        format!("{}.{}", id, ext)
    }
}

/// Validate an upload's type and write it into `upload_dir`.
///
/// # Returns
///
/// The stored file name, relative to `upload_dir`.
#[instrument(skip(upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
pub async fn store_image(upload_dir: &Path, upload: &ImageUpload) -> Result<String> {
    if !allowed_file(&upload.filename) {
        debug!("Rejecting upload with unsupported extension");
        return Err(ServiceError::UnsupportedImageType(upload.filename.clone()));
    }

    tokio::fs::create_dir_all(upload_dir).await?;
    let filename = stored_filename(&upload.filename);
    tokio::fs::write(upload_dir.join(&filename), &upload.bytes).await?;

    info!("Stored uploaded image as {}", filename);
    Ok(filename)
}

/// Delete a stored upload whose row could not be written.
///
/// Failures are logged and swallowed, the caller reports the original error.
pub async fn discard_image(upload_dir: &Path, filename: &str) {
    match tokio::fs::remove_file(upload_dir.join(filename)).await {
        Ok(()) => debug!("Discarded unreferenced image {}", filename),
        Err(e) => warn!("Could not discard image {}: {}", filename, e),
    }
}
