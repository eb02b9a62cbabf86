//! Order route handlers.
//!
//! Orders are looked up in the session's `latestOrder`; only the most recent
//! order is kept.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{OrderId, OrderSnapshot};

use super::checkout::{TotalsView, service};
use crate::error::Result;
use crate::state::AppState;
use crate::storage::SessionStore;

/// Order display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: OrderSnapshot,
    pub totals_display: TotalsView,
    pub payment_label: &'static str,
    /// Page the shopper is sent to after placing the order.
    pub path: String,
}

impl From<OrderSnapshot> for OrderView {
    fn from(order: OrderSnapshot) -> Self {
        Self {
            totals_display: (*order.totals()).into(),
            payment_label: order.draft.payment_method.label(),
            path: format!("/order/{}", order.id),
            order,
        }
    }
}

/// Order detail.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<OrderView>> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let order = checkout.order(&OrderId::new(id)).await?;
    Ok(Json(order.into()))
}

/// Mark the order paid.
#[instrument(skip(state, session))]
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<OrderView>> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let order = checkout.mark_paid(&OrderId::new(id)).await?;
    Ok(Json(order.into()))
}

/// Mark the order delivered.
#[instrument(skip(state, session))]
pub async fn deliver(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<OrderView>> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let order = checkout.mark_delivered(&OrderId::new(id)).await?;
    Ok(Json(order.into()))
}
