//! Application state shared across handlers.

use std::sync::Arc;

use crate::checkout::PendingOrders;
use crate::config::StoreApiConfig;
use crate::events::CartEvents;
use crate::services::{CatalogClient, OrderClient, ServiceError, StoreApiClient, UserClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store API clients, the cart event channel and the in-flight order guard.
/// Shopper state itself lives in each request's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: StoreApiClient,
    catalog: CatalogClient,
    orders: OrderClient,
    users: UserClient,
    events: CartEvents,
    pending: PendingOrders,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the HTTP client cannot be built or the
    /// bundled demo catalog does not parse.
    pub fn new(config: &StoreApiConfig) -> Result<Self, ServiceError> {
        let api = StoreApiClient::new(config)?;
        let catalog = CatalogClient::new(api.clone())?;
        let orders = OrderClient::new(api.clone(), config.order_demo_delay);
        let users = UserClient::new(api.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                api,
                catalog,
                orders,
                users,
                events: CartEvents::new(),
                pending: PendingOrders::new(),
            }),
        })
    }

    /// Get a reference to the raw store API client.
    #[must_use]
    pub fn api(&self) -> &StoreApiClient {
        &self.inner.api
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the order client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }

    /// Get a reference to the account client.
    #[must_use]
    pub fn users(&self) -> &UserClient {
        &self.inner.users
    }

    /// Get a reference to the cart event channel.
    #[must_use]
    pub fn events(&self) -> &CartEvents {
        &self.inner.events
    }

    /// Get a reference to the in-flight order guard.
    #[must_use]
    pub fn pending(&self) -> &PendingOrders {
        &self.inner.pending
    }
}
