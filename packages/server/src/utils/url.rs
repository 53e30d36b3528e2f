/// URL path prefix under which stored uploads are served.
pub const UPLOAD_PATH: &str = "/uploads";

/// Build the public URL of a stored image.
///
/// An empty reference means the item has no image and resolves to an empty
/// string.
pub fn resolve_image_url(blob_ref: &str, base_url: &str) -> String {
    if blob_ref.is_empty() {
        return String::new();
    }
    format!("{}{UPLOAD_PATH}/{blob_ref}", base_url.trim_end_matches('/'))
}
