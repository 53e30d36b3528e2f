use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::utils::url::resolve_image_url;

/// Raw, unvalidated menu fields as submitted by a client.
///
/// Every value is kept as text, whether it arrived as a multipart form field
/// or as a JSON scalar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MenuFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub rating: Option<String>,
    pub orders: Option<String>,
}

impl MenuFields {
    /// Set a field by its wire name. Unknown names are ignored.
    pub fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "name" => &mut self.name,
            "price" => &mut self.price,
            "category" => &mut self.category,
            "subCategory" => &mut self.sub_category,
            "rating" => &mut self.rating,
            "orders" => &mut self.orders,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Collect fields from a JSON object body.
    pub fn from_json(map: serde_json::Map<String, Value>) -> Self {
        let mut fields = Self::default();
        for (key, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            fields.set(&key, text);
        }
        fields
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    Missing(&'static str),
    #[error("Field 'price' must be a number, got '{0}'")]
    InvalidPrice(String),
}

/// A menu item that has passed validation and is ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub sub_category: Option<String>,
    pub rating: Option<String>,
    pub orders: i64,
    /// Stored blob name, empty when no image was uploaded.
    pub image_ref: String,
}

impl NewMenuItem {
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }
}

impl TryFrom<MenuFields> for NewMenuItem {
    type Error = ValidationError;

    fn try_from(fields: MenuFields) -> Result<Self, Self::Error> {
        let name = required(fields.name, "name")?;
        let price_text = required(fields.price, "price")?;
        let category = required(fields.category, "category")?;

        let price = price_text
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or(ValidationError::InvalidPrice(price_text))?;

        Ok(Self {
            name,
            price,
            category,
            sub_category: optional(fields.sub_category),
            rating: optional(fields.rating),
            orders: parse_orders(fields.orders.as_deref()),
            image_ref: String::new(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    optional(value).ok_or(ValidationError::Missing(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Order count, falling back to 0 for anything that is not an integer.
///
/// Integral floats such as `"3.0"` are accepted.
fn parse_orders(value: Option<&str>) -> i64 {
    let Some(text) = value.map(str::trim) else {
        return 0;
    };
    if let Ok(n) = text.parse::<i64>() {
        return n;
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
        _ => 0,
    }
}

/// A persisted menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub sub_category: Option<String>,
    pub rating: Option<String>,
    pub orders: i64,
    pub image_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu item as returned by the API, with the image reference resolved to a URL.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    /// Database ID (ObjectId hex).
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2ab4d3e8a9f0c1d2e3")]
    pub id: String,
    #[schema(example = "Masala Tea")]
    pub name: String,
    #[schema(example = 10)]
    pub price: f64,
    #[schema(example = "Drinks")]
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Hot")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "4.5")]
    pub rating: Option<String>,
    #[schema(example = 0)]
    pub orders: i64,
    /// Absolute image URL, or an empty string when the item has no image.
    #[schema(example = "http://localhost:3000/uploads/0192f0c4a1b27c3d8e9f001122334455.png")]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemResponse {
    pub fn from_item(item: MenuItem, base_url: &str) -> Self {
        let image = resolve_image_url(&item.image_ref, base_url);
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            category: item.category,
            sub_category: item.sub_category,
            rating: item.rating,
            orders: item.orders,
            image,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateMenuItemResponse {
    #[schema(example = "Item added successfully")]
    pub message: String,
    pub item: MenuItemResponse,
}
