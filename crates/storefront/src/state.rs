//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartCollection;
use crate::catalog::JsonProductCatalog;
use crate::config::StorefrontConfig;
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the cart, the catalog and configuration. Both documents share one
/// [`DocumentStore`], so all writers to a file go through the same lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartCollection,
    catalog: JsonProductCatalog,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = Arc::new(DocumentStore::new());
        let cart = CartCollection::new(Arc::clone(&store), config.data.cart_path());
        let catalog = JsonProductCatalog::new(store, config.data.products_path());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartCollection {
        &self.inner.cart
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &JsonProductCatalog {
        &self.inner.catalog
    }
}
