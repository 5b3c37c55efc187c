//! Local filesystem storage for uploaded media.
//!
//! Uploaded files land in one of three configured directories (images,
//! videos, documents) under a unique generated name. The relative path is
//! what gets persisted on the owning row and served statically.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::StorageConfig;
use crate::{AppError, AppResult};

/// A file that has been written to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Path relative to the process working directory, e.g.
    /// `upload/image-1714390000000-123456789.png`. Forward slashes always.
    pub path: String,
    /// Generated file name without the directory.
    pub file_name: String,
    /// Lowercased extension without the dot (`png`, `mp4`, ...), or `bin`.
    pub extension: String,
}

/// Storage service for uploaded files.
#[derive(Debug, Clone)]
pub struct StorageService {
    upload_dir: PathBuf,
    video_dir: PathBuf,
    document_dir: PathBuf,
}

impl StorageService {
    /// Create a new storage service from configuration.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            video_dir: PathBuf::from(&config.video_dir),
            document_dir: PathBuf::from(&config.document_dir),
        }
    }

    /// Store an uploaded image under the image directory.
    pub async fn store_image(
        &self,
        field_name: &str,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<StoredFile> {
        self.store_in(&self.upload_dir, field_name, original_name, data)
            .await
    }

    /// Store an uploaded video under the video directory.
    pub async fn store_video(
        &self,
        field_name: &str,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<StoredFile> {
        self.store_in(&self.video_dir, field_name, original_name, data)
            .await
    }

    /// Store an uploaded document under the document directory.
    pub async fn store_document(
        &self,
        field_name: &str,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<StoredFile> {
        self.store_in(&self.document_dir, field_name, original_name, data)
            .await
    }

    async fn store_in(
        &self,
        dir: &Path,
        field_name: &str,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<StoredFile> {
        let (file_name, extension) = generate_upload_name(field_name, original_name);
        let path = dir.join(&file_name);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create directory: {e}")))?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write file: {e}")))?;

        Ok(StoredFile {
            path: path.to_string_lossy().replace('\\', "/"),
            file_name,
            extension,
        })
    }

    /// Delete a stored file by its relative path. Missing files are ignored.
    pub async fn delete(&self, relative_path: &str) -> AppResult<()> {
        let path = Path::new(relative_path);
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("Failed to delete file: {e}"))),
        }
    }

    /// Delete a stored file, logging instead of failing.
    ///
    /// Used after a transaction has already committed, where a stale file on
    /// disk is preferable to failing the request.
    pub async fn delete_best_effort(&self, relative_path: &str) {
        if let Err(e) = self.delete(relative_path).await {
            tracing::warn!(path = %relative_path, error = %e, "Failed to remove stored file");
        }
    }

    /// Absolute-ish path for serving/downloading a stored relative path.
    #[must_use]
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        PathBuf::from(relative_path)
    }
}

/// Generate a unique upload file name: `<field>-<millis>-<random>.<ext>`.
///
/// Returns the name and the normalized extension.
#[must_use]
pub fn generate_upload_name(field_name: &str, original_name: &str) -> (String, String) {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    let extension = original_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= 10
                && *ext != original_name
                && ext.chars().all(char::is_alphanumeric)
        })
        .map(str::to_lowercase)
        .unwrap_or_else(|| "bin".to_string());

    (
        format!("{field_name}-{millis}-{suffix}.{extension}"),
        extension,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_upload_name_shape() {
        let (name, ext) = generate_upload_name("image", "photo.PNG");
        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".png"));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_generate_upload_name_no_extension() {
        let (name, ext) = generate_upload_name("document_file", "notes");
        assert!(name.ends_with(".bin"));
        assert_eq!(ext, "bin");
    }

    #[test]
    fn test_generate_upload_name_unique() {
        let (a, _) = generate_upload_name("video_file", "clip.mp4");
        let (b, _) = generate_upload_name("video_file", "clip.mp4");
        // Random suffix makes collisions within a millisecond unlikely.
        assert_ne!(a, b);
    }
}
