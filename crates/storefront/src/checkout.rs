//! Checkout service.
//!
//! Drives the four gated steps over persisted shopper state:
//!
//! 1. Sign in - an identity under `userInfo`
//! 2. Shipping - a validated address under `shippingAddress`
//! 3. Payment - a method under `paymentMethod`
//! 4. Place order - turns the cart into an order under `latestOrder`
//!
//! Gating is re-derived from storage on every call through
//! [`CheckoutService::state`], so edits made by another tab or a direct URL
//! are always re-validated.
//!
//! # Placing an order
//!
//! [`CheckoutService::place_order`] either completes every side effect
//! (order persisted, cart cleared, `cart-updated` signalled) or none of them.
//! A second placement for the same scope while one is pending is rejected
//! with [`CheckoutError::InFlight`].

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use fashion_store_core::{
    CheckoutState, CheckoutStep, FieldErrors, LineItem, OrderDraft, OrderId, OrderSnapshot,
    OrderTotals, PaymentMethod, ShippingAddress, ShippingForm, StepAccess, UserInfo, cart,
};

use crate::cart::{CartError, CartStore};
use crate::events::CartEvents;
use crate::services::ServiceError;
use crate::storage::{self, DocumentStore, StorageError, keys};

/// Creates orders from drafts. Implemented by the order API client.
pub trait OrderGateway: Send + Sync {
    fn create_order(
        &self,
        draft: &OrderDraft,
        user: &UserInfo,
    ) -> impl Future<Output = Result<OrderSnapshot, ServiceError>> + Send;
}

/// Errors from checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Form fields failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A prerequisite step is incomplete.
    #[error("complete the {0} step first")]
    StepLocked(CheckoutStep),

    /// Every step is complete but the cart is empty.
    #[error("cart is empty")]
    EmptyCart,

    /// An order placement for this shopper is already pending.
    #[error("an order is already being placed")]
    InFlight,

    /// No order with this id is on record.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// The order collaborator rejected the order.
    #[error("order service error: {0}")]
    Gateway(#[from] ServiceError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// =============================================================================
// In-flight guard
// =============================================================================

/// Order placements in progress, keyed by scope (one scope per shopper).
#[derive(Debug, Default)]
pub struct PendingOrders {
    scopes: Mutex<HashSet<String>>,
}

impl PendingOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `scope`. Returns `None` if a placement is already pending there.
    pub fn begin(&self, scope: &str) -> Option<PendingGuard<'_>> {
        let inserted = self
            .scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope.to_owned());

        inserted.then(|| PendingGuard {
            pending: self,
            scope: scope.to_owned(),
        })
    }

    #[must_use]
    pub fn is_pending(&self, scope: &str) -> bool {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(scope)
    }
}

/// Releases its scope when dropped, whether the placement succeeded or not.
#[derive(Debug)]
pub struct PendingGuard<'a> {
    pending: &'a PendingOrders,
    scope: String,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending
            .scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.scope);
    }
}

// =============================================================================
// CheckoutService
// =============================================================================

/// Checkout operations for one shopper's store.
pub struct CheckoutService<'a, S: DocumentStore, G: OrderGateway> {
    store: &'a S,
    events: &'a CartEvents,
    gateway: &'a G,
    pending: &'a PendingOrders,
    scope: String,
}

impl<'a, S: DocumentStore, G: OrderGateway> CheckoutService<'a, S, G> {
    /// Create a checkout service. `scope` identifies the shopper for the
    /// in-flight guard (a session id in the server, the data directory in the
    /// CLI).
    #[must_use]
    pub fn new(
        store: &'a S,
        events: &'a CartEvents,
        gateway: &'a G,
        pending: &'a PendingOrders,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            store,
            events,
            gateway,
            pending,
            scope: scope.into(),
        }
    }

    fn cart(&self) -> CartStore<'a, S> {
        CartStore::new(self.store, self.events)
    }

    /// Snapshot of the gating inputs, read fresh from storage.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Storage` if any document cannot be read.
    pub async fn state(&self) -> Result<CheckoutState, CheckoutError> {
        let user = self.user().await?;
        let address = self.shipping_address().await?;
        let payment = self.payment_method().await?;
        let items = self.cart().list().await?;

        Ok(CheckoutState {
            authenticated: user.is_some(),
            has_shipping_address: address.is_some_and(|a| !a.address.trim().is_empty()),
            has_payment_method: payment.is_some(),
            cart_item_count: cart::count(&items),
        })
    }

    /// Whether `step` may be entered right now, and where to go if not.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Storage` if state cannot be read.
    pub async fn guard(&self, step: CheckoutStep) -> Result<StepAccess, CheckoutError> {
        let access = self.state().await?.resolve(step);
        if access != StepAccess::Allowed {
            tracing::debug!(?step, ?access, "Checkout step not available");
        }
        Ok(access)
    }

    async fn require(&self, step: CheckoutStep) -> Result<CheckoutState, CheckoutError> {
        let state = self.state().await?;
        match state.resolve(step) {
            StepAccess::Allowed => Ok(state),
            StepAccess::Redirect(required) => Err(CheckoutError::StepLocked(required)),
            StepAccess::EmptyCart => Err(CheckoutError::EmptyCart),
        }
    }

    async fn user(&self) -> Result<Option<UserInfo>, CheckoutError> {
        Ok(storage::load(self.store, keys::USER_INFO).await?)
    }

    /// Persisted shipping address, if any.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Storage` if the document cannot be read.
    pub async fn shipping_address(&self) -> Result<Option<ShippingAddress>, CheckoutError> {
        Ok(storage::load(self.store, keys::SHIPPING_ADDRESS).await?)
    }

    /// Persisted payment method, if any.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Storage` if the document cannot be read.
    pub async fn payment_method(&self) -> Result<Option<PaymentMethod>, CheckoutError> {
        Ok(storage::load(self.store, keys::PAYMENT_METHOD).await?)
    }

    /// Validate and persist the shipping form.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::StepLocked` when signed out,
    /// `CheckoutError::Validation` with every failing field (nothing is
    /// persisted), or `CheckoutError::Storage`.
    #[instrument(skip_all)]
    pub async fn save_shipping(&self, form: &ShippingForm) -> Result<ShippingAddress, CheckoutError> {
        self.require(CheckoutStep::Shipping).await?;

        let address = form.validate().map_err(CheckoutError::Validation)?;
        storage::save(self.store, keys::SHIPPING_ADDRESS, &address).await?;

        tracing::info!(city = %address.city, "Shipping address saved");
        Ok(address)
    }

    /// Persist the payment method.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::StepLocked` if the payment step is not yet
    /// available, or `CheckoutError::Storage`.
    #[instrument(skip(self))]
    pub async fn save_payment(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.require(CheckoutStep::Payment).await?;
        storage::save(self.store, keys::PAYMENT_METHOD, &method).await?;
        tracing::info!("Payment method saved");
        Ok(())
    }

    /// Totals for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Cart` if the cart cannot be read.
    pub async fn totals(&self) -> Result<OrderTotals, CheckoutError> {
        Ok(OrderTotals::compute(&self.cart().list().await?))
    }

    /// Turn the cart into an order.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::InFlight` if a placement for this scope is pending
    /// - `CheckoutError::StepLocked` / `CheckoutError::EmptyCart` if the
    ///   place-order step is not available
    /// - `CheckoutError::Gateway` if the order collaborator fails
    /// - `CheckoutError::Storage` / `CheckoutError::Cart` if persistence
    ///   fails; no side effect is left behind in that case, except when the
    ///   final commit fails after the cart was cleared
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn place_order(&self) -> Result<OrderSnapshot, CheckoutError> {
        let _guard = self
            .pending
            .begin(&self.scope)
            .ok_or(CheckoutError::InFlight)?;

        self.require(CheckoutStep::PlaceOrder).await?;

        let (user, draft) = self.draft().await?;
        let order = self.gateway.create_order(&draft, &user).await?;

        let previous = self.store.get(keys::LATEST_ORDER).await?;
        storage::save(self.store, keys::LATEST_ORDER, &order).await?;

        if let Err(e) = self.cart().clear().await {
            tracing::error!(error = %e, order_id = %order.id, "Failed to clear cart, rolling back order");
            self.restore_latest(previous).await;
            return Err(e.into());
        }

        // Commit while the scope is still claimed, so a retry on the same
        // shopper reads the emptied cart
        if let Err(e) = self.store.flush().await {
            tracing::error!(error = %e, order_id = %order.id, "Failed to commit placed order");
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order.id,
            total = %order.totals().grand_total,
            "Order placed"
        );
        Ok(order)
    }

    async fn draft(&self) -> Result<(UserInfo, OrderDraft), CheckoutError> {
        let user = self
            .user()
            .await?
            .ok_or(CheckoutError::StepLocked(CheckoutStep::SignIn))?;
        let address = self
            .shipping_address()
            .await?
            .ok_or(CheckoutError::StepLocked(CheckoutStep::Shipping))?;
        let payment = self
            .payment_method()
            .await?
            .ok_or(CheckoutError::StepLocked(CheckoutStep::Payment))?;
        let items: Vec<LineItem> = self.cart().list().await?;

        Ok((user, OrderDraft::new(items, address, payment)))
    }

    async fn restore_latest(&self, previous: Option<serde_json::Value>) {
        let restored = match previous {
            Some(value) => self.store.set(keys::LATEST_ORDER, value).await,
            None => self.store.remove(keys::LATEST_ORDER).await,
        };
        if let Err(e) = restored {
            tracing::error!(error = %e, "Failed to restore previous latest order");
        }
    }

    /// The most recently placed order, if any.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Storage` if the document cannot be read.
    pub async fn latest_order(&self) -> Result<Option<OrderSnapshot>, CheckoutError> {
        Ok(storage::load(self.store, keys::LATEST_ORDER).await?)
    }

    /// The order with `id`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` unless `id` is the latest order.
    pub async fn order(&self, id: &OrderId) -> Result<OrderSnapshot, CheckoutError> {
        self.latest_order()
            .await?
            .filter(|order| &order.id == id)
            .ok_or_else(|| CheckoutError::OrderNotFound(id.clone()))
    }

    /// Mark the order paid. Idempotent: the first timestamp is kept.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` or `CheckoutError::Storage`.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: &OrderId) -> Result<OrderSnapshot, CheckoutError> {
        let mut order = self.order(id).await?;
        if order.mark_paid(Utc::now()) {
            storage::save(self.store, keys::LATEST_ORDER, &order).await?;
            tracing::info!("Order marked paid");
        }
        Ok(order)
    }

    /// Mark the order delivered. Idempotent: the first timestamp is kept.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` or `CheckoutError::Storage`.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: &OrderId) -> Result<OrderSnapshot, CheckoutError> {
        let mut order = self.order(id).await?;
        if order.mark_delivered(Utc::now()) {
            storage::save(self.store, keys::LATEST_ORDER, &order).await?;
            tracing::info!("Order marked delivered");
        }
        Ok(order)
    }
}
