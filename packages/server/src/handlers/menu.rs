use axum::Json;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::{BlobRef, BlobStore};
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::menu_form::MenuForm;
use crate::models::menu::{CreateMenuItemResponse, MenuItemResponse, NewMenuItem};
use crate::state::AppState;

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn menu_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let image = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(image.saturating_add(FORM_OVERHEAD))
}

#[utoipa::path(
    get,
    path = "/menu",
    tag = "Menu",
    operation_id = "listMenu",
    summary = "List all menu items",
    description = "Returns every menu item in insertion order. The `image` field is an absolute \
        URL built from the configured base address, or an empty string when the item has no image.",
    responses(
        (status = 200, description = "All menu items", body = Vec<MenuItemResponse>),
        (status = 503, description = "Database unavailable (REPOSITORY_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_menu(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    let items = state.menu.list_all().await?;
    let base_url = state.config.public_base_url();

    Ok(Json(
        items
            .into_iter()
            .map(|item| MenuItemResponse::from_item(item, &base_url))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/menu",
    tag = "Menu",
    operation_id = "createMenuItem",
    summary = "Add a menu item",
    description = "Creates a menu item from `multipart/form-data` or a JSON object. Fields: \
        `name`, `price`, `category` (required), `subCategory`, `rating`, `orders` (optional; \
        `orders` defaults to 0 when absent or not an integer). Multipart requests may carry one \
        `image` file part (image/* only, at most the configured size).",
    request_body(content_type = "multipart/form-data", description = "Menu fields with optional image"),
    responses(
        (status = 201, description = "Item created", body = CreateMenuItemResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "Image too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Upload is not an image (INVALID_MEDIA_TYPE)", body = ErrorBody),
        (status = 500, description = "Image could not be written (STORAGE_ERROR)", body = ErrorBody),
        (status = 503, description = "Database unavailable (REPOSITORY_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    form: MenuForm,
) -> Result<impl IntoResponse, AppError> {
    let MenuForm { fields, image } = form;

    // Validate before touching storage so a bad form never leaves a blob behind.
    let new_item = NewMenuItem::try_from(fields)?;

    let blob_ref = match image {
        Some(upload) => Some(
            state
                .blob_store
                .store(
                    &upload.bytes,
                    &upload.file_name,
                    upload.content_type.as_deref(),
                )
                .await?,
        ),
        None => None,
    };
    let new_item =
        new_item.with_image_ref(blob_ref.as_ref().map(BlobRef::as_str).unwrap_or_default());

    let item = match state.menu.create(new_item).await {
        Ok(item) => item,
        Err(e) => {
            if let Some(blob_ref) = &blob_ref {
                discard_orphan(&*state.blob_store, blob_ref).await;
            }
            return Err(e.into());
        }
    };

    info!(id = %item.id, name = %item.name, image = %item.image_ref, "Menu item created");

    let base_url = state.config.public_base_url();
    Ok((
        StatusCode::CREATED,
        Json(CreateMenuItemResponse {
            message: "Item added successfully".into(),
            item: MenuItemResponse::from_item(item, &base_url),
        }),
    ))
}

/// Best-effort removal of a blob whose record could not be written.
async fn discard_orphan(blob_store: &dyn BlobStore, blob_ref: &BlobRef) {
    match blob_store.delete(blob_ref).await {
        Ok(_) => info!(blob = %blob_ref, "Removed image of failed menu insert"),
        Err(e) => warn!(blob = %blob_ref, error = %e, "Failed to remove orphaned image"),
    }
}
