use mime_guess::Mime;
use mime_guess::mime::{APPLICATION_OCTET_STREAM, IMAGE};

use super::error::StorageError;

/// Resolve the effective MIME type of an upload and require it to be `image/*`.
///
/// A missing or `application/octet-stream` declaration falls back to a guess
/// from the file name.
pub fn require_image(content_type: Option<&str>, original_name: &str) -> Result<Mime, StorageError> {
    let declared = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .map(|ct| {
            ct.parse::<Mime>()
                .map_err(|_| StorageError::InvalidMediaType(ct.to_string()))
        })
        .transpose()?;

    let effective = match declared {
        Some(mime) if mime.essence_str() != APPLICATION_OCTET_STREAM.essence_str() => mime,
        _ => mime_guess::from_path(original_name).first_or_octet_stream(),
    };

    if effective.type_() != IMAGE {
        return Err(StorageError::InvalidMediaType(effective.essence_str().to_string()));
    }

    Ok(effective)
}
