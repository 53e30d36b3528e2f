use std::fmt::Display;
use std::path::Path;

use uuid::Uuid;

/// Longest extension carried over from the uploaded file name.
const MAX_EXTENSION_LEN: usize = 8;

/// Build a stored file name from a unique token and the client's file name.
///
/// The extension of `original_name` is kept (lower-cased) when it is short and
/// purely alphanumeric; otherwise the name is just the token.
pub fn blob_name(token: impl Display, original_name: &str) -> String {
    match sanitized_extension(original_name) {
        Some(ext) => format!("{token}.{ext}"),
        None => token.to_string(),
    }
}

/// Generate a fresh, collision-resistant stored name for an upload.
///
/// The token is a UUIDv7, so generated names sort by creation time.
pub fn generate_blob_name(original_name: &str) -> String {
    blob_name(Uuid::now_v7().simple(), original_name)
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    // Client file names may carry Windows separators.
    let file_name = original_name.rsplit(['/', '\\']).next()?;
    let ext = Path::new(file_name).extension()?.to_str()?;

    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}
