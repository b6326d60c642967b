//! File-backed shopping cart.
//!
//! [`CartCollection`] applies one [`CartDocument`] mutation per call through
//! [`DocumentStore::update`], so every mutation is a full load, mutate and
//! save cycle under the cart file's lock.
//!
//! Product IDs are taken as given: `add` never consults the catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use flatcart_core::{CartDocument, LineItem, NotInCart, ProductId};
use thiserror::Error;
use tracing::instrument;

use crate::store::{DocumentStore, StoreError};

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product has no line in the cart. Nothing was written.
    #[error("product {0} not found in cart")]
    NotFound(ProductId),

    /// The cart file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<NotInCart> for CartError {
    fn from(err: NotInCart) -> Self {
        Self::NotFound(err.0)
    }
}

/// The cart persisted at a single JSON file.
#[derive(Debug, Clone)]
pub struct CartCollection {
    store: Arc<DocumentStore>,
    path: PathBuf,
}

impl CartCollection {
    /// Create a cart backed by the document at `path`.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    /// Path of the backing cart file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<CartDocument, CartError> {
        Ok(self.store.load(&self.path, CartDocument::new()).await?)
    }

    async fn update<F>(&self, mutate: F) -> Result<(), CartError>
    where
        F: FnOnce(&mut CartDocument) -> Result<(), CartError>,
    {
        self.store
            .update(&self.path, CartDocument::new(), mutate)
            .await
    }

    /// Current line items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the cart file is unreadable or corrupt.
    pub async fn list(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self.load().await?.into_items())
    }

    /// Total number of units in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the cart file is unreadable or corrupt.
    pub async fn count(&self) -> Result<u64, CartError> {
        Ok(self.load().await?.total_quantity())
    }

    /// Add one unit of a product, creating its line if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if the cart file cannot be loaded or saved.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn add(&self, product_id: &ProductId) -> Result<(), CartError> {
        let id = product_id.clone();
        self.update(move |cart| {
            cart.add(id);
            Ok(())
        })
        .await?;

        tracing::info!(product_id = %product_id, "Product added to cart");
        Ok(())
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product has no line, or
    /// [`CartError::Store`] on a storage fault.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn increment(&self, product_id: &ProductId) -> Result<(), CartError> {
        self.update(|cart| Ok(cart.increment(product_id)?)).await?;

        tracing::info!(product_id = %product_id, "Cart quantity incremented");
        Ok(())
    }

    /// Remove one unit from an existing line; a line at quantity 1 is removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product has no line, or
    /// [`CartError::Store`] on a storage fault.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn decrement(&self, product_id: &ProductId) -> Result<(), CartError> {
        self.update(|cart| Ok(cart.decrement(product_id)?)).await?;

        tracing::info!(product_id = %product_id, "Cart quantity decremented");
        Ok(())
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product has no line, or
    /// [`CartError::Store`] on a storage fault.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<(), CartError> {
        self.update(|cart| {
            cart.remove(product_id)?;
            Ok(())
        })
        .await?;

        tracing::info!(product_id = %product_id, "Item deleted from cart");
        Ok(())
    }
}
