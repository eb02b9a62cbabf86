//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{MAX_SELECTABLE_QUANTITY, Price, Product, ProductId};

use crate::error::Result;
use crate::state::AppState;
use crate::storage::SessionStore;
use crate::wishlist::WishlistStore;

/// Product display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
    pub in_stock: bool,
    /// Largest quantity the quantity selector offers.
    pub max_selectable: u32,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            price_display: Price::inr(product.price).display(),
            in_stock: product.in_stock(),
            max_selectable: product.count_in_stock.min(MAX_SELECTABLE_QUANTITY),
            product,
        }
    }
}

/// Product detail with the shopper's wishlist membership.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub view: ProductView,
    pub in_wishlist: bool,
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = state.catalog().list_products().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Product detail.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailView>> {
    let id = ProductId::new(id);
    let product = state.catalog().get_product(&id).await?;

    let store = SessionStore::new(session);
    let in_wishlist = WishlistStore::new(&store).contains(&id).await?;

    Ok(Json(ProductDetailView {
        view: product.into(),
        in_wishlist,
    }))
}
