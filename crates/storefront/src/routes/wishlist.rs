//! Wishlist route handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{Product, ProductId};

use super::cart::CartView;
use super::cart_updated;
use crate::cart::CartStore;
use crate::error::Result;
use crate::state::AppState;
use crate::storage::SessionStore;
use crate::wishlist::WishlistStore;

/// Wishlist display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<Vec<Product>> for WishlistView {
    fn from(items: Vec<Product>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleView {
    pub in_wishlist: bool,
    #[serde(flatten)]
    pub wishlist: WishlistView,
}

/// Wishlist request naming one product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistForm {
    pub product_id: ProductId,
}

/// Display wishlist.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<WishlistView>> {
    let store = SessionStore::new(session);
    let items = WishlistStore::new(&store).list().await?;
    Ok(Json(items.into()))
}

/// Add or remove a product.
///
/// Only adding needs the catalog; removal works for products the catalog no
/// longer knows.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<WishlistForm>,
) -> Result<Json<ToggleView>> {
    let store = SessionStore::new(session);
    let wishlist = WishlistStore::new(&store);

    let in_wishlist = if wishlist.contains(&form.product_id).await? {
        wishlist.remove(&form.product_id).await?;
        false
    } else {
        let product = state.catalog().get_product(&form.product_id).await?;
        wishlist.toggle(&product).await?
    };

    Ok(Json(ToggleView {
        in_wishlist,
        wishlist: wishlist.list().await?.into(),
    }))
}

/// Remove a product.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(form): Json<WishlistForm>) -> Result<Json<WishlistView>> {
    let store = SessionStore::new(session);
    let items = WishlistStore::new(&store).remove(&form.product_id).await?;
    Ok(Json(items.into()))
}

/// Add one unit of a wishlisted product to the cart. The entry stays.
#[instrument(skip(state, session))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<WishlistForm>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let cart = CartStore::new(&store, state.events());
    let items = WishlistStore::new(&store)
        .move_to_cart(&form.product_id, &cart)
        .await?;

    Ok((cart_updated(), Json(CartView::new(items))).into_response())
}
