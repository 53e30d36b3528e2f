use std::sync::Arc;

use common::storage::BlobStore;

use crate::config::AppConfig;
use crate::repository::MenuRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub menu: Arc<dyn MenuRepository>,
    pub blob_store: Arc<dyn BlobStore>,
}
