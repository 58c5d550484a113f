use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

/// Writes uploaded documents to the local upload directory and hands back the
/// stored filename, which doubles as the retrieval reference under
/// `/api/uploads/`.
#[derive(Clone)]
pub struct UploadService {
    upload_dir: PathBuf,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Stores one document and returns its reference. Each stored name is
    /// prefixed with a fresh UUID, so two requests uploading the same
    /// original filename never contend for the same path.
    pub async fn store(&self, original_name: &str, data: &Bytes) -> Result<String> {
        let ext = extension_of(original_name)
            .ok_or_else(|| Error::UnsupportedFileType("(none)".to_string()))?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::UnsupportedFileType(ext));
        }

        fs::create_dir_all(&self.upload_dir).await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.upload_dir.join(&stored_name);
        fs::write(&path, data).await.map_err(|e| {
            tracing::error!(error = ?e, path = %path.display(), "failed to write upload");
            Error::Internal("Failed to save uploaded file".to_string())
        })?;

        Ok(stored_name)
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Keeps alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore. Strips any path components a client smuggles in.
fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
