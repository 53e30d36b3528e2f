use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemBlobStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use menu_server::config::AppConfig;
use menu_server::database::init_db;
use menu_server::repository::MongoMenuRepository;
use menu_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before the subscriber so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_server=info,tower_http=info".into()),
        )
        .init();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Failed to load .env, continuing without it"),
    }

    let config = AppConfig::load().context("Failed to load config (is MONGO_URI set?)")?;

    let db = init_db(&config.database.uri, &config.database.name)
        .await
        .context("MongoDB connection failed")?;

    let blob_store = FilesystemBlobStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_upload_size,
    );
    info!(
        upload_dir = %blob_store.base_path().display(),
        max_upload_size = blob_store.max_size(),
        "Image storage configured"
    );

    let state = AppState {
        config: config.clone(),
        menu: Arc::new(MongoMenuRepository::new(&db)),
        blob_store: Arc::new(blob_store),
    };

    let app = menu_server::build_router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, base_url = %config.public_base_url(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
