use async_trait::async_trait;
use bson::{DateTime, Document, doc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::warn;

use super::{MenuRepository, RepositoryError};
use crate::entity::menu_item::{MENU_COLLECTION, MenuItemDoc};
use crate::models::menu::{MenuItem, NewMenuItem};

/// MongoDB-backed menu repository.
#[derive(Clone)]
pub struct MongoMenuRepository {
    collection: Collection<MenuItemDoc>,
}

impl MongoMenuRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(MENU_COLLECTION),
        }
    }
}

#[async_trait]
impl MenuRepository for MongoMenuRepository {
    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let doc = MenuItemDoc::new(item, DateTime::now());
        let result = self.collection.insert_one(&doc).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::Unavailable("insert did not return an ObjectId".into())
        })?;

        Ok(doc.into_item(id))
    }

    async fn list_all(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let docs: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(decode_items(docs))
    }
}

/// Convert raw documents into items, skipping any that cannot be read.
fn decode_items(docs: Vec<Document>) -> Vec<MenuItem> {
    docs.into_iter()
        .filter_map(|raw| {
            let id = raw.get_object_id("_id").ok();
            let doc = match bson::from_document::<MenuItemDoc>(raw) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(id = ?id, error = %e, "Skipping unreadable menu document");
                    return None;
                }
            };
            match doc.id {
                Some(id) => Some(doc.into_item(id)),
                None => {
                    warn!(name = %doc.name, "Skipping menu document without _id");
                    None
                }
            }
        })
        .collect()
}
