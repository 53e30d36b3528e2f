use async_trait::async_trait;

use super::blob_ref::BlobRef;
use super::error::StorageError;

/// Storage for uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Validate and persist an upload, returning the generated reference.
    ///
    /// `content_type` is the MIME type declared by the client, if any.
    /// Oversized or non-image input is rejected before anything is written.
    async fn store(
        &self,
        data: &[u8],
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<BlobRef, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, blob_ref: &BlobRef) -> Result<bool, StorageError>;
}
