use std::sync::RwLock;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use super::{MenuRepository, RepositoryError};
use crate::models::menu::{MenuItem, NewMenuItem};

/// Process-local menu repository, for tests and running without a database.
#[derive(Default)]
pub struct InMemoryMenuRepository {
    items: RwLock<Vec<MenuItem>>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".into())
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let now = Utc::now();
        let stored = MenuItem {
            id: ObjectId::new().to_hex(),
            name: item.name,
            price: item.price,
            category: item.category,
            sub_category: item.sub_category,
            rating: item.rating,
            orders: item.orders,
            image_ref: item.image_ref,
            created_at: now,
            updated_at: now,
        };

        self.items.write().map_err(poisoned)?.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        Ok(self.items.read().map_err(poisoned)?.clone())
    }
}
