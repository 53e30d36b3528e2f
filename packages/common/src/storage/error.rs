use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload does not declare an image MIME type.
    #[error("unsupported media type: {0}")]
    InvalidMediaType(String),
    /// The blob exceeds the configured size limit.
    #[error("blob exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: u64, limit: u64 },
    /// The provided blob reference is not a valid stored name.
    #[error("invalid blob reference: {0}")]
    InvalidRef(String),
    /// An I/O error occurred while writing or removing a blob.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
