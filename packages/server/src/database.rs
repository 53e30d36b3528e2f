use std::time::Duration;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to connect to MongoDB: {0}")]
    ConnectionFailed(#[from] mongodb::error::Error),
}

/// Connect to MongoDB and verify the connection with a ping.
///
/// The database named in the URI is used; `default_name` applies when the URI
/// names none.
pub async fn init_db(uri: &str, default_name: &str) -> Result<Database, DatabaseError> {
    let mut options = ClientOptions::parse(uri).await?;

    // Avoid hanging on an unreachable server at startup.
    options
        .server_selection_timeout
        .get_or_insert(Duration::from_secs(5));
    options.connect_timeout.get_or_insert(Duration::from_secs(5));
    options
        .app_name
        .get_or_insert_with(|| "menu-server".to_string());

    let client = Client::with_options(options)?;
    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(default_name));

    info!(database = %db.name(), "Connecting to MongoDB");
    db.run_command(doc! { "ping": 1 }).await?;
    info!(database = %db.name(), "MongoDB connected");

    Ok(db)
}
