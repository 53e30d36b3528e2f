use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::menu::MenuFields;
use crate::state::AppState;

/// Multipart part that carries the item image.
pub const IMAGE_FIELD: &str = "image";

/// An image file received with a menu form, not yet validated or stored.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Body of an add-item request.
///
/// Accepts `multipart/form-data` (text fields plus an optional `image` file
/// part) or a JSON object with the same field names.
#[derive(Debug)]
pub struct MenuForm {
    pub fields: MenuFields,
    pub image: Option<ImageUpload>,
}

impl FromRequest<AppState> for MenuForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            read_multipart(multipart, state.config.storage.max_upload_size).await
        } else if content_type.starts_with("application/json") {
            let Json(map) = Json::<Map<String, Value>>::from_request(req, state).await?;
            Ok(Self {
                fields: MenuFields::from_json(map),
                image: None,
            })
        } else {
            Err(AppError::Validation(
                "Expected a multipart/form-data or application/json body".into(),
            ))
        }
    }
}

async fn read_multipart(mut multipart: Multipart, max_image_size: u64) -> Result<MenuForm, AppError> {
    let mut fields = MenuFields::default();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            if let Some(upload) = read_image(field, max_image_size).await? {
                if image.is_some() {
                    return Err(AppError::Validation(
                        "Only one image may be uploaded per item".into(),
                    ));
                }
                image = Some(upload);
            }
        } else {
            let text = field.text().await?;
            fields.set(&name, text);
        }
    }

    Ok(MenuForm { fields, image })
}

/// Buffer an image part, discarding its bytes once it exceeds `max_size`.
///
/// The rest of an oversized part is still read so the client sees the 413
/// instead of a reset connection. Returns `None` for the empty part browsers
/// send when no file was chosen.
async fn read_image(mut field: Field<'_>, max_size: u64) -> Result<Option<ImageUpload>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut buf: Vec<u8> = Vec::new();
    let mut oversized = false;
    while let Some(chunk) = field.chunk().await? {
        if oversized {
            continue;
        }
        if (buf.len() + chunk.len()) as u64 > max_size {
            oversized = true;
            buf = Vec::new();
            continue;
        }
        buf.extend_from_slice(&chunk);
    }

    if oversized {
        return Err(AppError::PayloadTooLarge(format!(
            "Image exceeds maximum size of {max_size} bytes"
        )));
    }

    if file_name.is_empty() && buf.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes: Bytes::from(buf),
    }))
}
