mod blob_ref;
mod error;
mod media;
mod naming;
mod traits;

pub mod filesystem;

pub use blob_ref::BlobRef;
pub use error::StorageError;
pub use media::require_image;
pub use naming::{blob_name, generate_blob_name};
pub use traits::BlobStore;
