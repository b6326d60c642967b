//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use flatcart_core::{ProductId, ProductRecord};
use tracing::instrument;

use crate::catalog::ProductCatalog;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Shop front page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Shop</title></head>
<body>
<header><h1>Shop</h1><a href="/cart">Cart (<span class="cart-count">{{ cart_count }}</span>)</a></header>
{% if products.is_empty() %}
<p>No products yet.</p>
{% else %}
<ul class="products">
{% for product in products %}
  <li>
    {% if let Some(path) = product.image_path %}<img src="{{ path }}" alt="{{ product.title }}" width="160">{% endif %}
    <h2><a href="/product/{{ product.id }}">{{ product.title }}</a></h2>
    <p>{{ product.price }}</p>
    <form method="post" action="/cart/add">
      <input type="hidden" name="productId" value="{{ product.id }}">
      <button type="submit">Add to cart</button>
    </form>
  </li>
{% endfor %}
</ul>
{% endif %}
</body>
</html>"#
)]
pub struct HomeTemplate {
    pub products: Vec<ProductRecord>,
    pub cart_count: u64,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{{ product.title }}</title></head>
<body>
<p><a href="/">Back to shop</a> | <a href="/cart">Cart</a></p>
<article>
  {% if let Some(path) = product.image_path %}<img src="{{ path }}" alt="{{ product.title }}" width="320">{% endif %}
  <h1>{{ product.title }}</h1>
  <p class="price">{{ product.price }}</p>
  <p>{{ product.description }}</p>
  <form method="post" action="/cart/add">
    <input type="hidden" name="productId" value="{{ product.id }}">
    <button type="submit">Add to cart</button>
  </form>
</article>
</body>
</html>"#
)]
pub struct ProductShowTemplate {
    pub product: ProductRecord,
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<HomeTemplate> {
    let products = state.catalog().all().await?;
    let cart_count = state.cart().count().await?;

    Ok(HomeTemplate {
        products,
        cart_count,
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = state
        .catalog()
        .find_by_id(&ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(ProductShowTemplate { product })
}
