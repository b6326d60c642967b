//! Integration tests for Flatcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flatcart-integration-tests
//! ```
//!
//! Each test builds the full storefront router in-process against its own
//! temporary data directory and drives it with `tower::ServiceExt::oneshot`.
//! No server or network is needed.

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use flatcart_storefront::config::StorefrontConfig;
use flatcart_storefront::state::AppState;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Response status, selected headers and body text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// A storefront app over a fresh data directory.
pub struct TestContext {
    dir: TempDir,
    app: Router,
}

impl TestContext {
    /// Create a context with no data files.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StorefrontConfig::with_data_dir(dir.path().join("data"));
        let app = flatcart_storefront::app(AppState::new(config));
        Self { dir, app }
    }

    /// Create a context whose products file holds `products`.
    ///
    /// # Panics
    ///
    /// Panics if the products file cannot be written.
    #[must_use]
    pub fn with_products(products: &Value) -> Self {
        let ctx = Self::new();
        ctx.write_data_file("products.json", &products.to_string());
        ctx
    }

    /// Path of a file in the data directory.
    #[must_use]
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.dir.path().join("data").join(name)
    }

    /// Overwrite a data file with raw contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_data_file(&self, name: &str, contents: &str) {
        let path = self.data_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create data dir");
        }
        std::fs::write(path, contents).expect("Failed to write data file");
    }

    /// Parsed contents of the cart file, or `None` if it does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the cart file exists but is not JSON.
    #[must_use]
    pub fn cart_file(&self) -> Option<Value> {
        let raw = std::fs::read_to_string(self.data_path("cart.json")).ok()?;
        Some(serde_json::from_str(&raw).expect("cart file is not JSON"))
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let (parts, body) = response.into_parts();
        let header_value = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let location = header_value(header::LOCATION.as_str());
        let request_id = header_value("x-request-id");

        let bytes = to_bytes(body, usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status: parts.status,
            location,
            request_id,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::get(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// `POST path` with a urlencoded `productId`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_form(&self, path: &str, product_id: &str) -> TestResponse {
        let body = format!("productId={}", urlencoding::encode(product_id));
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// `POST path` with a JSON `{"productId": ...}` body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_json(&self, path: &str, product_id: &str) -> TestResponse {
        let body = serde_json::json!({ "productId": product_id }).to_string();
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
