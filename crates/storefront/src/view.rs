//! Display-ready cart lines.
//!
//! Joins the stored cart against the product catalog. A line whose product
//! is no longer in the catalog is skipped; it stays in the cart file until
//! it is explicitly removed.

use flatcart_core::{Price, ProductId};
use serde::Serialize;

use crate::cart::{CartCollection, CartError};
use crate::catalog::ProductCatalog;

/// One cart line with its product details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub image_path: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of all line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Cart view over a cart and a catalog.
pub struct CartView<'a, C> {
    cart: &'a CartCollection,
    catalog: &'a C,
}

impl<'a, C: ProductCatalog> CartView<'a, C> {
    #[must_use]
    pub const fn new(cart: &'a CartCollection, catalog: &'a C) -> Self {
        Self { cart, catalog }
    }

    /// Cart lines in cart order, without lines for unknown products.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the cart or catalog cannot be read.
    pub async fn render(&self) -> Result<Vec<CartLine>, CartError> {
        let items = self.cart.list().await?;
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let Some(product) = self.catalog.find_by_id(&item.product_id).await? else {
                tracing::debug!(
                    product_id = %item.product_id,
                    "Skipping cart line for unknown product"
                );
                continue;
            };
            lines.push(CartLine {
                id: product.id,
                title: product.title,
                price: product.price,
                description: product.description,
                image_path: product.image_path,
                quantity: item.quantity(),
            });
        }

        Ok(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use flatcart_core::ProductRecord;
    use tempfile::TempDir;

    use crate::catalog::CatalogSnapshot;
    use crate::store::DocumentStore;

    fn product(id: &str, title: &str, cents: i64) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            description: format!("{title} description"),
            image_path: Some(format!("/uploads/{id}.jpg")),
        }
    }

    fn cart_in(dir: &TempDir) -> CartCollection {
        CartCollection::new(Arc::new(DocumentStore::new()), dir.path().join("cart.json"))
    }

    #[tokio::test]
    async fn test_render_joins_in_cart_order() {
        let dir = TempDir::new().unwrap();
        let cart = cart_in(&dir);
        let catalog =
            CatalogSnapshot::new(vec![product("a", "Alpha", 100), product("b", "Beta", 250)]);

        cart.add(&ProductId::new("b")).await.unwrap();
        cart.add(&ProductId::new("a")).await.unwrap();
        cart.add(&ProductId::new("b")).await.unwrap();

        let lines = CartView::new(&cart, &catalog).render().await.unwrap();
        let summary: Vec<_> = lines
            .iter()
            .map(|l| (l.title.as_str(), l.quantity))
            .collect();
        assert_eq!(summary, [("Beta", 2), ("Alpha", 1)]);

        let first = lines.first().unwrap();
        assert_eq!(first.description, "Beta description");
        assert_eq!(first.image_path.as_deref(), Some("/uploads/b.jpg"));
        assert_eq!(first.line_total(), Price::from_cents(500));
        assert_eq!(subtotal(&lines), Price::from_cents(600));
    }

    #[tokio::test]
    async fn test_render_drops_orphans_but_keeps_them_stored() {
        let dir = TempDir::new().unwrap();
        let cart = cart_in(&dir);
        let catalog = CatalogSnapshot::new(vec![product("a", "Alpha", 100)]);

        cart.add(&ProductId::new("gone")).await.unwrap();
        cart.add(&ProductId::new("a")).await.unwrap();

        let lines = CartView::new(&cart, &catalog).render().await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().id, ProductId::new("a"));

        assert_eq!(cart.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_render_empty_cart() {
        let dir = TempDir::new().unwrap();
        let cart = cart_in(&dir);
        let catalog = CatalogSnapshot::default();

        let lines = CartView::new(&cart, &catalog).render().await.unwrap();
        assert!(lines.is_empty());
        assert_eq!(subtotal(&[]), Price::ZERO);
    }
}
