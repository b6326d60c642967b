//! Cart route handlers.
//!
//! The cart page renders server-side. Quantity buttons post to the
//! increment/decrement/delete endpoints with `fetch` and reload the page;
//! those endpoints answer with a bare status so they also work as a small
//! JSON or form API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use flatcart_core::{Price, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::CartError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::view::{self, CartLine, CartView};

/// Cart mutation payload, as a urlencoded form or a JSON body.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
}

/// Extractor for the product ID of a cart mutation.
///
/// Reads a JSON body when `Content-Type` is `application/json` and a form
/// body otherwise. Rejects a blank ID with 400.
#[derive(Debug)]
pub struct CartInput(pub ProductId);

impl<S> FromRequest<S> for CartInput
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let CartForm { product_id } = if is_json {
            let Json(form) = Json::<CartForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            form
        } else {
            let Form(form) = Form::<CartForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            form
        };

        if product_id.is_blank() {
            return Err(
                AppError::BadRequest("productId is required".to_string()).into_response(),
            );
        }

        Ok(Self(product_id))
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Your cart</title></head>
<body>
<h1>Your cart</h1>
<p><a href="/">Continue shopping</a></p>
{% if lines.is_empty() %}
<p>Your cart is empty.</p>
{% else %}
<table>
  <thead><tr><th></th><th>Product</th><th>Price</th><th>Quantity</th><th>Total</th><th></th></tr></thead>
  <tbody>
  {% for line in lines %}
    <tr data-product-id="{{ line.id }}">
      <td>{% if let Some(path) = line.image_path %}<img src="{{ path }}" alt="{{ line.title }}" width="64">{% endif %}</td>
      <td><a href="/product/{{ line.id }}">{{ line.title }}</a><br><small>{{ line.description }}</small></td>
      <td>{{ line.price }}</td>
      <td>
        <button data-action="decrement">-</button>
        {{ line.quantity }}
        <button data-action="increment">+</button>
      </td>
      <td>{{ line.line_total() }}</td>
      <td><button data-action="delete">Remove</button></td>
    </tr>
  {% endfor %}
  </tbody>
</table>
<p>Subtotal: {{ subtotal }}</p>
{% endif %}
<script>
document.querySelectorAll("button[data-action]").forEach(function (button) {
  button.addEventListener("click", function () {
    var productId = button.closest("tr").dataset.productId;
    fetch("/cart/" + button.dataset.action, {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ productId: productId })
    }).then(function () { window.location.reload(); });
  });
});
</script>
</body>
</html>"#
)]
pub struct CartShowTemplate {
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<span class="cart-count">{{ count }}</span>"#
)]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Load the cart lines that can be displayed.
async fn render_lines(state: &AppState) -> Result<Vec<CartLine>> {
    let catalog = state.catalog().snapshot().await?;
    Ok(CartView::new(state.cart(), &catalog).render().await?)
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let lines = render_lines(&state).await?;
    let subtotal = view::subtotal(&lines);

    Ok(CartShowTemplate { lines, subtotal })
}

/// Cart lines as JSON.
#[instrument(skip(state))]
pub async fn items(State(state): State<AppState>) -> Result<Json<Vec<CartLine>>> {
    Ok(Json(render_lines(&state).await?))
}

/// Get cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let count = state.cart().count().await?;
    Ok(CartCountTemplate { count })
}

/// Add one unit of a product, then return to the shop.
///
/// The product ID is not checked against the catalog.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    CartInput(product_id): CartInput,
) -> Result<Redirect> {
    state.cart().add(&product_id).await?;
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Redirect::to("/"))
}

/// Add one unit to an existing line.
#[instrument(skip(state))]
pub async fn increment(
    State(state): State<AppState>,
    CartInput(product_id): CartInput,
) -> Result<(StatusCode, &'static str)> {
    state.cart().increment(&product_id).await?;
    Ok((StatusCode::OK, "OK"))
}

/// Remove one unit from an existing line.
#[instrument(skip(state))]
pub async fn decrement(
    State(state): State<AppState>,
    CartInput(product_id): CartInput,
) -> Result<(StatusCode, &'static str)> {
    state.cart().decrement(&product_id).await?;
    Ok((StatusCode::OK, "OK"))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    CartInput(product_id): CartInput,
) -> Result<(StatusCode, &'static str)> {
    match state.cart().remove(&product_id).await {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", product_id.as_str())]),
            );
            Ok((StatusCode::OK, "OK"))
        }
        Err(CartError::NotFound(_)) => {
            Err(AppError::NotFound("Item not found in cart".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
