pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::CorsConfig;
use crate::state::AppState;
use crate::utils::url::UPLOAD_PATH;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Menu Catalog API",
        version = "1.0.0",
        description = "List menu items and add new ones with an optional image"
    ),
    paths(
        handlers::health::health,
        handlers::menu::list_menu,
        handlers::menu::create_menu_item,
    ),
    components(schemas(error::ErrorBody)),
    tags(
        (name = "Menu", description = "Menu catalog"),
        (name = "Health", description = "Liveness"),
    ),
)]
pub struct ApiDoc;

/// Build the application router.
///
/// Stored images are served read-only from the upload directory under
/// [`UPLOAD_PATH`].
pub fn build_router(state: AppState) -> axum::Router {
    let upload_dir = state.config.storage.upload_dir.clone();
    let cors = cors_layer(&state.config.server.cors);

    routes::app_routes(&state.config)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .nest_service(UPLOAD_PATH, ServeDir::new(upload_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allow_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "Ignoring invalid CORS origin");
                        None
                    }
                }),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}
