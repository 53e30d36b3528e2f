mod memory;
mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::menu::{MenuItem, NewMenuItem};

pub use memory::InMemoryMenuRepository;
pub use mongo::MongoMenuRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("menu repository unavailable: {0}")]
    Unavailable(String),
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        RepositoryError::Unavailable(err.to_string())
    }
}

/// Persistence for menu items.
///
/// Only validated [`NewMenuItem`]s can be created; the repository assigns the
/// ID and timestamps.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Persist a new item and return the stored record.
    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepositoryError>;

    /// All items in insertion order.
    async fn list_all(&self) -> Result<Vec<MenuItem>, RepositoryError>;
}
