//! Disk-backed storage for uploaded feedback images.
//!
//! Images land in a configured container (a sub-directory of the storage
//! root) under a freshly generated unique name that preserves the original
//! file extension.  The returned URL embeds the container name and is
//! served back by the API's image route.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;

/// Accepted raster image extensions, lowercase, with the leading dot.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Rejection message listing the allow-list.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported image format. Allowed formats: .jpg, .jpeg, .png, .gif";

/// Verify that a resolved path stays within the expected base directory.
/// Prevents path traversal attacks.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, ApiError> {
    // Canonicalize base; target may not exist yet so normalize manually
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let mut resolved = canonical_base.clone();
    for component in target
        .strip_prefix(&canonical_base)
        .unwrap_or(target)
        .components()
    {
        match component {
            std::path::Component::Normal(c) => resolved.push(c),
            std::path::Component::ParentDir => {
                return Err(ApiError::BadRequest("Path traversal detected".to_string()));
            }
            _ => {} // RootDir, CurDir, Prefix — skip
        }
    }
    if !resolved.starts_with(&canonical_base) {
        return Err(ApiError::BadRequest("Path traversal detected".to_string()));
    }
    Ok(resolved)
}

/// Extract the lowercased extension (with dot) from a file name.
fn extension_of(file_name: &str) -> Option<String> {
    let idx = file_name.rfind('.')?;
    if idx == 0 || idx + 1 == file_name.len() {
        return None;
    }
    Some(file_name[idx..].to_ascii_lowercase())
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    base_path: PathBuf,
    container: String,
    public_base_url: String,
    max_size: usize,
}

impl BlobStore {
    pub async fn new(
        base_path: PathBuf,
        container: String,
        public_base_url: String,
        max_size: usize,
    ) -> Result<Self, ApiError> {
        let container_dir = base_path.join(&container);
        fs::create_dir_all(&container_dir).await.map_err(|e| {
            ApiError::BlobStorage(format!(
                "Failed to create blob container '{}': {}",
                container_dir.display(),
                e
            ))
        })?;

        info!(path = %container_dir.display(), "Blob store initialized");

        Ok(Self {
            base_path,
            container,
            public_base_url,
            max_size,
        })
    }

    /// The configured container name (also the URL path segment).
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Returns `true` if the file name carries an allow-listed extension.
    pub fn is_allowed_extension(file_name: &str) -> bool {
        extension_of(file_name)
            .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Store an uploaded image and return its retrievable URL.
    ///
    /// Rejects empty uploads, files without an allow-listed extension, and
    /// files above the configured size cap.  The stored name is a fresh
    /// UUID plus the original extension.
    pub async fn store_image(&self, file_name: &str, data: &[u8]) -> Result<String, ApiError> {
        if data.is_empty() {
            return Err(ApiError::Validation("No file uploaded".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ApiError::FileTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let ext = match extension_of(file_name) {
            Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => ext,
            _ => return Err(ApiError::Validation(UNSUPPORTED_FORMAT_MESSAGE.to_string())),
        };

        let blob_name = format!("{}{}", Uuid::new_v4(), ext);
        let path = self.safe_image_path(&blob_name)?;

        fs::write(&path, data).await.map_err(|e| {
            ApiError::BlobStorage(format!("Failed to write image {}: {}", blob_name, e))
        })?;

        debug!(name = %blob_name, size = data.len(), "Stored image");

        Ok(format!(
            "{}/images/{}/{}",
            self.public_base_url, self.container, blob_name
        ))
    }

    /// Read a stored image back for serving.
    pub async fn open_image(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        let path = self.safe_image_path(name)?;

        if !path.exists() {
            return Err(ApiError::NotFound("Image not found".to_string()));
        }

        let data = fs::read(&path)
            .await
            .map_err(|e| ApiError::BlobStorage(format!("Failed to read image {}: {}", name, e)))?;

        debug!(name = %name, size = data.len(), "Retrieved image");
        Ok(data)
    }

    /// Safe path inside the container directory, validated against
    /// traversal.
    fn safe_image_path(&self, name: &str) -> Result<PathBuf, ApiError> {
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(ApiError::BadRequest("Path traversal detected".to_string()));
        }
        let raw = self.base_path.join(&self.container).join(name);
        ensure_within(&self.base_path, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (BlobStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(
            dir.path().to_path_buf(),
            "feedback-images".to_string(),
            "http://localhost:8080".to_string(),
            1024 * 1024,
        )
        .await
        .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let (store, _dir) = test_store().await;

        let url = store.store_image("photo.jpg", b"jpeg-bytes").await.unwrap();
        assert!(url.contains("/feedback-images/"));
        assert!(url.ends_with(".jpg"));

        let name = url.rsplit('/').next().unwrap();
        let data = store.open_image(name).await.unwrap();
        assert_eq!(data, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_all_allowed_extensions_accepted() {
        let (store, _dir) = test_store().await;

        for name in ["x.jpg", "x.jpeg", "x.PNG", "x.gif"] {
            let url = store.store_image(name, b"data").await.unwrap();
            assert!(url.contains(store.container()));
        }
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let (store, _dir) = test_store().await;

        for name in ["x.txt", "x.pdf", "noext", "x."] {
            let err = store.store_image(name, b"data").await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(ref m) if m == UNSUPPORTED_FORMAT_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let (store, _dir) = test_store().await;
        let err = store.store_image("x.png", b"").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "No file uploaded"));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(
            dir.path().to_path_buf(),
            "c".to_string(),
            "http://localhost".to_string(),
            8,
        )
        .await
        .unwrap();

        let err = store.store_image("x.png", b"123456789").await.unwrap_err();
        assert!(matches!(err, ApiError::FileTooLarge { size: 9, max: 8 }));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (store, _dir) = test_store().await;
        assert!(store.open_image("../../etc/passwd").await.is_err());
        assert!(store.open_image("..\\secret.png").await.is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.JPG"), Some(".jpg".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
