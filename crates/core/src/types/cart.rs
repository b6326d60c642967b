//! Cart document and line items.
//!
//! A [`CartDocument`] is the whole persisted cart: an ordered list of
//! [`LineItem`]s, one per product. It serializes as a bare JSON array:
//!
//! ```json
//! [
//!   { "productId": "p1", "quantity": 2 },
//!   { "productId": "p7", "quantity": 1 }
//! ]
//! ```
//!
//! Invariants upheld by every mutation and checked on deserialization:
//! - at most one line item per product ID
//! - every quantity is at least 1 (a line reaching zero is removed)

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;

/// One product/quantity pairing inside the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Referenced product. Not checked against the catalog.
    pub product_id: ProductId,
    /// Number of units, never zero.
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Get the quantity as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// The mutation target is not in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product {0} is not in the cart")]
pub struct NotInCart(pub ProductId);

/// A deserialized cart violated one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartDocumentError {
    #[error("duplicate line item for product {0}")]
    DuplicateProduct(ProductId),
}

/// Ordered collection of line items, unique by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct CartDocument {
    items: Vec<LineItem>,
}

impl TryFrom<Vec<LineItem>> for CartDocument {
    type Error = CartDocumentError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id.as_str()) {
                return Err(CartDocumentError::DuplicateProduct(
                    item.product_id.clone(),
                ));
            }
        }
        Ok(Self { items })
    }
}

impl From<CartDocument> for Vec<LineItem> {
    fn from(document: CartDocument) -> Self {
        document.items
    }
}

impl CartDocument {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items in insertion order.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn find(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Result<usize, NotInCart> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
            .ok_or_else(|| NotInCart(product_id.clone()))
    }

    fn item_mut(&mut self, product_id: &ProductId) -> Result<&mut LineItem, NotInCart> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
            .ok_or_else(|| NotInCart(product_id.clone()))
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    pub fn add(&mut self, product_id: ProductId) {
        match self.item_mut(&product_id) {
            Ok(item) => item.quantity = item.quantity.saturating_add(1),
            Err(_) => self.items.push(LineItem::new(product_id)),
        }
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`NotInCart`] if the product has no line; the cart is unchanged.
    pub fn increment(&mut self, product_id: &ProductId) -> Result<(), NotInCart> {
        let item = self.item_mut(product_id)?;
        item.quantity = item.quantity.saturating_add(1);
        Ok(())
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    ///
    /// # Errors
    ///
    /// Returns [`NotInCart`] if the product has no line; the cart is unchanged.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<(), NotInCart> {
        let index = self.position(product_id)?;
        let Some(item) = self.items.get_mut(index) else {
            return Err(NotInCart(product_id.clone()));
        };
        match NonZeroU32::new(item.quantity.get() - 1) {
            Some(quantity) => item.quantity = quantity,
            None => {
                self.items.remove(index);
            }
        }
        Ok(())
    }

    /// Remove a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`NotInCart`] if the product has no line; the cart is unchanged.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<LineItem, NotInCart> {
        let index = self.position(product_id)?;
        Ok(self.items.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(cart: &CartDocument) -> Vec<&str> {
        cart.items().iter().map(|i| i.product_id.as_str()).collect()
    }

    fn qty(cart: &CartDocument, id: &str) -> Option<u32> {
        cart.find(&ProductId::new(id)).map(LineItem::quantity)
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut cart = CartDocument::new();
        cart.add(ProductId::new("p1"));
        assert_eq!(cart.items(), &[LineItem::new(ProductId::new("p1"))]);

        cart.add(ProductId::new("p1"));
        assert_eq!(cart.len(), 1);
        assert_eq!(qty(&cart, "p1"), Some(2));
    }

    #[test]
    fn test_mutations_preserve_order() {
        let mut cart = CartDocument::new();
        for id in ["p1", "p2", "p3"] {
            cart.add(ProductId::new(id));
        }
        cart.increment(&ProductId::new("p2")).unwrap();
        cart.add(ProductId::new("p1"));

        assert_eq!(ids(&cart), ["p1", "p2", "p3"]);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = CartDocument::new();
        cart.add(ProductId::new("p1"));
        cart.add(ProductId::new("p2"));
        cart.add(ProductId::new("p2"));

        cart.decrement(&ProductId::new("p2")).unwrap();
        assert_eq!(qty(&cart, "p2"), Some(1));

        cart.decrement(&ProductId::new("p1")).unwrap();
        assert_eq!(qty(&cart, "p1"), None);
        assert_eq!(ids(&cart), ["p2"]);
    }

    #[test]
    fn test_missing_product_leaves_cart_unchanged() {
        let mut cart = CartDocument::new();
        cart.add(ProductId::new("p1"));
        let before = cart.clone();
        let unknown = ProductId::new("unknown");

        assert_eq!(cart.increment(&unknown), Err(NotInCart(unknown.clone())));
        assert_eq!(cart.decrement(&unknown), Err(NotInCart(unknown.clone())));
        assert_eq!(cart.remove(&unknown), Err(NotInCart(unknown.clone())));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_deletes_whole_line() {
        let mut cart = CartDocument::new();
        cart.add(ProductId::new("p1"));
        cart.add(ProductId::new("p1"));
        cart.add(ProductId::new("p2"));

        let removed = cart.remove(&ProductId::new("p1")).unwrap();
        assert_eq!(removed.quantity(), 2);
        assert_eq!(ids(&cart), ["p2"]);
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart: CartDocument =
            serde_json::from_str(r#"[{"productId":"p1","quantity":4294967295}]"#).unwrap();
        cart.add(ProductId::new("p1"));
        assert_eq!(qty(&cart, "p1"), Some(u32::MAX));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = CartDocument::new();
        cart.add(ProductId::new("p1"));
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"[{"productId":"p1","quantity":1}]"#);
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let result = serde_json::from_str::<CartDocument>(r#"[{"productId":"p1","quantity":0}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_products() {
        let result = serde_json::from_str::<CartDocument>(
            r#"[{"productId":"p1","quantity":1},{"productId":"p1","quantity":3}]"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("duplicate line item for product p1"));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(serde_json::from_str::<CartDocument>(r#"{"productId":"p1"}"#).is_err());
        assert!(serde_json::from_str::<CartDocument>(r#"[{"productId":"p1"}]"#).is_err());
        assert!(serde_json::from_str::<CartDocument>(r#"[{"quantity":1}]"#).is_err());
    }
}
