//! Product catalog lookup.
//!
//! The catalog is read-only from the storefront's point of view. It is kept
//! as a JSON array of [`ProductRecord`]s in the products file, written by the
//! admin side.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flatcart_core::{ProductId, ProductRecord};

use crate::store::{DocumentStore, StoreError};

/// Read-only product lookup.
pub trait ProductCatalog {
    /// Find a product by ID, returning `None` if the catalog has no such product.
    fn find_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<ProductRecord>, StoreError>> + Send;
}

/// Catalog backed by the products JSON file.
///
/// Every call reads the file, so edits to the catalog are picked up without
/// a restart. Use [`JsonProductCatalog::snapshot`] to read it once for a
/// batch of lookups.
#[derive(Debug, Clone)]
pub struct JsonProductCatalog {
    store: Arc<DocumentStore>,
    path: PathBuf,
}

impl JsonProductCatalog {
    /// Create a catalog backed by the document at `path`.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    /// Path of the backing products file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All products in file order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the products file is unreadable or corrupt.
    pub async fn all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        self.store.load(&self.path, Vec::new()).await
    }

    /// Read the catalog once into memory.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the products file is unreadable or corrupt.
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, StoreError> {
        Ok(CatalogSnapshot::new(self.all().await?))
    }
}

impl ProductCatalog for JsonProductCatalog {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.all().await?.into_iter().find(|p| &p.id == id))
    }
}

/// In-memory catalog contents.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<ProductRecord>,
}

impl CatalogSnapshot {
    /// Wrap already-loaded products.
    #[must_use]
    pub const fn new(products: Vec<ProductRecord>) -> Self {
        Self { products }
    }

    /// All products, in file order.
    #[must_use]
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// The first product with this ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|p| &p.id == id)
    }
}

impl ProductCatalog for CatalogSnapshot {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.get(id).cloned())
    }
}
