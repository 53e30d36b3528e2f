use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::blob_ref::BlobRef;
use super::error::StorageError;
use super::media::require_image;
use super::naming::generate_blob_name;
use super::traits::BlobStore;

/// Filesystem-backed image store.
///
/// Blobs are stored flat under `base_path` by generated name, so the directory
/// can be served directly as static files. The directory is created on the
/// first write, not at construction.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    pub fn new(base_path: PathBuf, max_size: u64) -> Self {
        Self {
            base_path,
            max_size,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    fn blob_path(&self, blob_ref: &BlobRef) -> PathBuf {
        self.base_path.join(blob_ref.as_str())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(format!(".upload-{}.tmp", uuid::Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn store(
        &self,
        data: &[u8],
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<BlobRef, StorageError> {
        let actual = data.len() as u64;
        if actual > self.max_size {
            return Err(StorageError::TooLarge {
                actual,
                limit: self.max_size,
            });
        }
        require_image(content_type, original_name)?;

        fs::create_dir_all(&self.base_path).await?;

        let blob_ref = BlobRef::from_generated(generate_blob_name(original_name));
        let blob_path = self.blob_path(&blob_ref);
        let temp_path = self.temp_path();

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &blob_path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(blob = %blob_ref, size = actual, "Stored blob");
        Ok(blob_ref)
    }

    async fn delete(&self, blob_ref: &BlobRef) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(blob_ref)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
