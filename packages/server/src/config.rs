use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public address used to build image URLs. Derived from `port` when unset.
    pub base_url: Option<String>,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    /// Database used when the URI does not name one.
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::load_from(vars)
    }

    /// Build the configuration from an explicit set of environment variables.
    pub fn load_from(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| vars.get(key).filter(|v| !v.trim().is_empty()).cloned();

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.name", "menu")?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.max_upload_size", 2 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MENU__STORAGE__UPLOAD_DIR)
            .add_source(
                Environment::with_prefix("MENU")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .source(Some(vars.clone())),
            )
            // Plain deployment variables win over everything else.
            .set_override_option("server.port", non_empty("PORT"))?
            .set_override_option("server.base_url", non_empty("BASE_URL"))?
            .set_override_option("database.uri", non_empty("MONGO_URI"))?
            .build()?;

        let config: Self = s.try_deserialize()?;
        if config.database.uri.trim().is_empty() {
            return Err(ConfigError::Message("MONGO_URI must not be empty".into()));
        }
        Ok(config)
    }

    /// Public address that image URLs are built from.
    pub fn public_base_url(&self) -> String {
        match &self.server.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.server.port),
        }
    }
}
