//! CLI command implementations.
//!
//! Every shopper command opens a [`Context`] over the data directory and
//! returns the text to print. Printing happens once, in `main`.

pub mod account;
pub mod checkout;
pub mod migrate;
pub mod shop;

use std::path::Path;

use thiserror::Error;

use fashion_store_core::{EmailError, FieldErrors};
use fashion_store_storefront::cart::{CartError, CartStore};
use fashion_store_storefront::checkout::{CheckoutError, CheckoutService};
use fashion_store_storefront::config::{ConfigError, StoreApiConfig};
use fashion_store_storefront::identity::IdentityStore;
use fashion_store_storefront::services::{OrderClient, ServiceError};
use fashion_store_storefront::state::AppState;
use fashion_store_storefront::storage::{FileStore, StorageError};
use fashion_store_storefront::wishlist::{WishlistError, WishlistStore};

/// Errors from shopper commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Invalid(FieldErrors),

    #[error("{0}")]
    Usage(&'static str),
}

/// Shared handles for one CLI invocation.
pub struct Context {
    state: AppState,
    store: FileStore,
    /// In-flight guard scope: one placement at a time per data directory.
    scope: String,
}

impl Context {
    /// Open the data directory with API settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API settings are invalid or the directory
    /// cannot be created.
    pub async fn open(data_dir: &Path) -> Result<Self, CommandError> {
        let api = StoreApiConfig::from_env()?;
        Self::with_api(data_dir, &api).await
    }

    /// Open the data directory with explicit API settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the directory
    /// cannot be created.
    pub async fn with_api(data_dir: &Path, api: &StoreApiConfig) -> Result<Self, CommandError> {
        let state = AppState::new(api)?;
        let store = FileStore::open(data_dir).await?;
        tracing::debug!(dir = %data_dir.display(), "Opened data directory");

        Ok(Self {
            state,
            store,
            scope: data_dir.display().to_string(),
        })
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub fn cart(&self) -> CartStore<'_, FileStore> {
        CartStore::new(&self.store, self.state.events())
    }

    pub const fn wishlist(&self) -> WishlistStore<'_, FileStore> {
        WishlistStore::new(&self.store)
    }

    pub const fn identity(&self) -> IdentityStore<'_, FileStore> {
        IdentityStore::new(&self.store)
    }

    pub fn checkout(&self) -> CheckoutService<'_, FileStore, OrderClient> {
        CheckoutService::new(
            &self.store,
            self.state.events(),
            self.state.orders(),
            self.state.pending(),
            self.scope.clone(),
        )
    }
}
