//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /product/{id}           - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart lines (JSON)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add to cart (redirects to /)
//! POST /cart/increment         - Increase quantity (200 or 404)
//! POST /cart/decrement         - Decrease quantity, removing at zero (200 or 404)
//! POST /cart/delete            - Remove line (200 or 404)
//!
//! # Assets
//! GET  /uploads/*              - Uploaded product images
//! GET  /static/*               - Public assets
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/delete", post(cart::delete))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/product/{id}", get(products::show))
        .nest("/cart", cart_routes())
}

/// Build the complete application: routes, static assets and the
/// request tracing stack.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config().uploads_dir);
    let public = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/uploads", uploads)
        .nest_service("/static", public)
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not touch the data files.
async fn health() -> &'static str {
    "ok"
}
