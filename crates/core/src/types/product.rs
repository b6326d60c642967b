//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as stored in the catalog file.
///
/// The catalog file uses `product_`-prefixed field names; the shorter names
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(rename = "product_title", alias = "title")]
    pub title: String,
    #[serde(rename = "product_price", alias = "price")]
    pub price: Price,
    #[serde(rename = "product_description", alias = "description", default)]
    pub description: String,
    #[serde(rename = "image_path", alias = "imagePath", default)]
    pub image_path: Option<String>,
}
