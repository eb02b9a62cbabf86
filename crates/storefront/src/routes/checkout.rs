//! Checkout route handlers.
//!
//! Each checkout page first asks [`CheckoutService::guard`] whether it may be
//! shown. A locked step answers `303 See Other` to the first unmet step (or to
//! `/cart` when only the cart is empty), so direct URLs and stale tabs land
//! where the shopper has to continue.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use fashion_store_core::{
    CheckoutState, CheckoutStep, OrderTotals, PaymentMethod, Price, ShippingAddress, ShippingForm,
    StepAccess,
};

use super::cart::CartView;
use super::cart_updated;
use super::orders::OrderView;
use crate::cart::CartStore;
use crate::checkout::{CheckoutError, CheckoutService};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::OrderClient;
use crate::state::AppState;
use crate::storage::SessionStore;

/// Cart page, where an empty cart sends the shopper.
const CART_PATH: &str = "/cart";

// =============================================================================
// Views
// =============================================================================

/// One step in the progress indicator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: CheckoutStep,
    pub label: &'static str,
    pub path: &'static str,
    pub enabled: bool,
}

/// Checkout progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsView {
    pub state: CheckoutState,
    pub steps: Vec<StepView>,
    pub next: CheckoutStep,
    pub progress_percent: u8,
}

impl From<CheckoutState> for StepsView {
    fn from(state: CheckoutState) -> Self {
        Self {
            steps: CheckoutStep::ALL
                .into_iter()
                .map(|step| StepView {
                    step,
                    label: step.label(),
                    path: step.path(),
                    enabled: state.is_enabled(step),
                })
                .collect(),
            next: state.next_required_step(),
            progress_percent: state.progress_percent(),
            state,
        }
    }
}

/// Shipping page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPageView {
    pub address: Option<ShippingAddress>,
    pub progress: StepsView,
}

/// Payment choice shown on the payment page.
#[derive(Debug, Serialize)]
pub struct PaymentOptionView {
    pub code: PaymentMethod,
    pub label: &'static str,
}

/// Payment page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPageView {
    pub selected: PaymentMethod,
    pub options: Vec<PaymentOptionView>,
    pub progress: StepsView,
}

/// Order totals formatted for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub items_display: String,
    pub shipping_display: String,
    pub tax_display: String,
    pub total_display: String,
}

impl From<OrderTotals> for TotalsView {
    fn from(totals: OrderTotals) -> Self {
        Self {
            items_display: Price::inr(totals.items_total).display(),
            shipping_display: Price::inr(totals.shipping_total).display(),
            tax_display: Price::inr(totals.tax_total).display(),
            total_display: Price::inr(totals.grand_total).display(),
            totals,
        }
    }
}

/// Place-order summary page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub cart: CartView,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub payment_label: &'static str,
    pub totals: TotalsView,
}

/// Where to go after a step was saved.
#[derive(Debug, Serialize)]
pub struct SavedView<T> {
    pub saved: T,
    pub next: &'static str,
}

/// Payment form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Helpers
// =============================================================================

/// Guard scope for in-flight placements. Sessions only get an id once they
/// have been saved; an unsaved session has nothing to order, so a throwaway
/// scope is enough.
fn order_scope(store: &SessionStore) -> String {
    store
        .session_id()
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub(super) fn service<'a>(
    state: &'a AppState,
    store: &'a SessionStore,
) -> CheckoutService<'a, SessionStore, OrderClient> {
    CheckoutService::new(
        store,
        state.events(),
        state.orders(),
        state.pending(),
        order_scope(store),
    )
}

fn redirect_for(access: StepAccess) -> Option<Response> {
    match access {
        StepAccess::Allowed => None,
        StepAccess::Redirect(step) => Some(Redirect::to(step.path()).into_response()),
        StepAccess::EmptyCart => Some(Redirect::to(CART_PATH).into_response()),
    }
}

/// Turn a locked-step error into the redirect a page would have answered.
fn locked_or_error(err: CheckoutError) -> Result<Response> {
    match err {
        CheckoutError::StepLocked(step) => Ok(Redirect::to(step.path()).into_response()),
        CheckoutError::EmptyCart => Ok(Redirect::to(CART_PATH).into_response()),
        other => Err(AppError::from(other)),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Checkout progress.
#[instrument(skip(state, session))]
pub async fn steps(State(state): State<AppState>, session: Session) -> Result<Json<StepsView>> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);
    Ok(Json(checkout.state().await?.into()))
}

/// Shipping page.
#[instrument(skip(state, session))]
pub async fn shipping_page(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let checkout_state = checkout.state().await?;
    if let Some(redirect) = redirect_for(checkout_state.resolve(CheckoutStep::Shipping)) {
        return Ok(redirect);
    }

    Ok(Json(ShippingPageView {
        address: checkout.shipping_address().await?,
        progress: checkout_state.into(),
    })
    .into_response())
}

/// Save shipping address.
#[instrument(skip(state, session, form))]
pub async fn save_shipping(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ShippingForm>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    match checkout.save_shipping(&form).await {
        Ok(address) => Ok(Json(SavedView {
            saved: address,
            next: CheckoutStep::Payment.path(),
        })
        .into_response()),
        Err(e) => locked_or_error(e),
    }
}

/// Payment page.
#[instrument(skip(state, session))]
pub async fn payment_page(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let checkout_state = checkout.state().await?;
    if let Some(redirect) = redirect_for(checkout_state.resolve(CheckoutStep::Payment)) {
        return Ok(redirect);
    }

    Ok(Json(PaymentPageView {
        selected: checkout.payment_method().await?.unwrap_or_default(),
        options: PaymentMethod::ALL
            .into_iter()
            .map(|code| PaymentOptionView {
                code,
                label: code.label(),
            })
            .collect(),
        progress: checkout_state.into(),
    })
    .into_response())
}

/// Save payment method.
#[instrument(skip(state, session))]
pub async fn save_payment(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<PaymentForm>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    match checkout.save_payment(form.payment_method).await {
        Ok(()) => Ok(Json(SavedView {
            saved: form.payment_method,
            next: CheckoutStep::PlaceOrder.path(),
        })
        .into_response()),
        Err(e) => locked_or_error(e),
    }
}

/// Place-order summary.
#[instrument(skip(state, session))]
pub async fn place_order_page(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    if let Some(redirect) = redirect_for(checkout.guard(CheckoutStep::PlaceOrder).await?) {
        return Ok(redirect);
    }

    // The guard just saw both documents; a concurrent sign-out or reset
    // makes them vanish, in which case the page is simply locked again.
    let (Some(shipping_address), Some(payment_method)) = (
        checkout.shipping_address().await?,
        checkout.payment_method().await?,
    ) else {
        return Ok(Redirect::to(CheckoutStep::Shipping.path()).into_response());
    };

    let items = CartStore::new(&store, state.events()).list().await?;
    let totals = OrderTotals::compute(&items);

    Ok(Json(SummaryView {
        cart: CartView::new(items),
        shipping_address,
        payment_label: payment_method.label(),
        payment_method,
        totals: totals.into(),
    })
    .into_response())
}

/// Place the order.
///
/// Answers `201 Created` with the order; the cart is empty afterwards.
/// A second submission while the first is pending answers `409 Conflict`.
#[instrument(skip(state, session))]
pub async fn place_order(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = SessionStore::new(session);
    let checkout = service(&state, &store);

    let order = match checkout.place_order().await {
        Ok(order) => order,
        Err(e) => return locked_or_error(e),
    };

    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));

    Ok((
        StatusCode::CREATED,
        cart_updated(),
        Json(OrderView::from(order)),
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_redirect_for_locked_step() {
        assert!(redirect_for(StepAccess::Allowed).is_none());

        let response = redirect_for(StepAccess::Redirect(CheckoutStep::SignIn)).unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");

        let response = redirect_for(StepAccess::EmptyCart).unwrap();
        assert_eq!(response.headers()[LOCATION], "/cart");
    }

    #[test]
    fn test_in_flight_is_not_a_redirect() {
        let err = locked_or_error(CheckoutError::InFlight).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_steps_view_progress() {
        let view = StepsView::from(CheckoutState {
            authenticated: true,
            has_shipping_address: true,
            has_payment_method: false,
            cart_item_count: 1,
        });
        assert_eq!(view.next, CheckoutStep::Payment);
        assert_eq!(view.progress_percent, 75);
        assert!(view.steps[2].enabled);
        assert!(!view.steps[3].enabled);
    }
}
