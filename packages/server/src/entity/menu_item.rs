//! MenuItem document schema
//!
//! Field names are camelCase with a `menus` collection, matching documents
//! already written by earlier deployments of the menu service.

use bson::{Bson, DateTime, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::menu::{MenuItem, NewMenuItem};

/// Collection name for menu items
pub const MENU_COLLECTION: &str = "menus";

/// Menu item document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    /// Written as Int32, Int64 or Double depending on the client
    #[serde(default, deserialize_with = "lenient_orders")]
    pub orders: i64,

    /// Stored blob name, empty when there is no image
    #[serde(default)]
    pub image: String,

    /// Missing on documents written before timestamps were tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Read `orders` from whatever numeric type the document holds.
///
/// Mirrors form parsing: integral values are kept, anything else reads as 0.
fn lenient_orders<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let orders = match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::Int32(n)) => i64::from(n),
        Some(Bson::Int64(n)) => n,
        Some(Bson::Double(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            f as i64
        }
        Some(Bson::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Ok(orders)
}

impl MenuItemDoc {
    /// Build a new document with both timestamps set to `now`.
    pub fn new(item: NewMenuItem, now: DateTime) -> Self {
        Self {
            id: None,
            name: item.name,
            price: item.price,
            category: item.category,
            sub_category: item.sub_category,
            rating: item.rating,
            orders: item.orders,
            image: item.image_ref,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Convert into the domain type, filling gaps left by legacy documents.
    pub fn into_item(self, fallback_id: ObjectId) -> MenuItem {
        let id = self.id.unwrap_or(fallback_id);
        let created_at = self.created_at.unwrap_or_else(|| id.timestamp());
        let updated_at = self.updated_at.unwrap_or(created_at);

        MenuItem {
            id: id.to_hex(),
            name: self.name,
            price: self.price,
            category: self.category,
            sub_category: self.sub_category,
            rating: self.rating,
            orders: self.orders,
            image_ref: self.image,
            created_at: created_at.to_chrono(),
            updated_at: updated_at.to_chrono(),
        }
    }
}
