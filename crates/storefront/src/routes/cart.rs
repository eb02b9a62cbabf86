//! Cart route handlers.
//!
//! Cart lines live in the session under `cartItems`. Every mutation answers
//! the updated cart plus an `HX-Trigger: cart-updated` header.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{LineItem, Price, ProductId, cart};

use super::cart_updated;
use crate::cart::CartStore;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Cart line display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: LineItem,
    pub price_display: String,
    pub line_total_display: String,
    pub max_selectable: u32,
}

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub subtotal_display: String,
}

impl CartView {
    #[must_use]
    pub fn new(items: Vec<LineItem>) -> Self {
        let item_count = cart::count(&items);
        let subtotal = cart::subtotal(&items);
        Self {
            items: items
                .into_iter()
                .map(|item| CartLineView {
                    price_display: Price::inr(item.unit_price).display(),
                    line_total_display: Price::inr(item.line_total()).display(),
                    max_selectable: item.max_selectable(),
                    item,
                })
                .collect(),
            item_count,
            subtotal,
            subtotal_display: Price::inr(subtotal).display(),
        }
    }
}

/// Cart count badge.
#[derive(Debug, Serialize, Deserialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Display cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let store = SessionStore::new(session);
    let items = CartStore::new(&store, state.events()).list().await?;
    Ok(Json(CartView::new(items)))
}

/// Add item to cart.
///
/// The product snapshot comes from the catalog, so price and stock limit are
/// whatever the catalog says at the time of adding.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().get_product(&form.product_id).await?;

    let store = SessionStore::new(session);
    let items = CartStore::new(&store, state.events())
        .add(&product, form.quantity.unwrap_or(1))
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok((cart_updated(), Json(CartView::new(items))).into_response())
}

/// Update cart item quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let items = CartStore::new(&store, state.events())
        .set_quantity(&form.product_id, form.quantity)
        .await?;

    Ok((cart_updated(), Json(CartView::new(items))).into_response())
}

/// Remove item from cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let items = CartStore::new(&store, state.events())
        .remove(&form.product_id)
        .await?;

    Ok((cart_updated(), Json(CartView::new(items))).into_response())
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = SessionStore::new(session);
    CartStore::new(&store, state.events()).clear().await?;

    Ok((cart_updated(), Json(CartView::new(Vec::new()))).into_response())
}

/// Get cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCountView>> {
    let store = SessionStore::new(session);
    let count = CartStore::new(&store, state.events()).count().await?;
    Ok(Json(CartCountView { count }))
}
