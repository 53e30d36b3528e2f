use axum::{Router, routing::get};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::health))
        .merge(menu_routes(config))
}

fn menu_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/menu",
            get(handlers::menu::list_menu).post(handlers::menu::create_menu_item),
        )
        .layer(handlers::menu::menu_body_limit(
            config.storage.max_upload_size,
        ))
}
