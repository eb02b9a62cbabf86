//! Wishlist store.
//!
//! Membership is boolean per product id; entries keep the full product
//! snapshot taken when they were added so the wishlist can be shown without
//! the catalog.

use thiserror::Error;
use tracing::instrument;

use fashion_store_core::{LineItem, Product, ProductId};

use crate::cart::{CartError, CartStore};
use crate::storage::{self, DocumentStore, StorageError, keys};

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("product {0} is not in the wishlist")]
    NotFound(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Wishlist operations over a document store.
pub struct WishlistStore<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> WishlistStore<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current entries, read from storage.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Storage` if the document cannot be read or decoded.
    pub async fn list(&self) -> Result<Vec<Product>, WishlistError> {
        Ok(storage::load(self.store, keys::WISHLIST_ITEMS)
            .await?
            .unwrap_or_default())
    }

    /// Whether `product_id` is wishlisted.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Storage` if the wishlist cannot be read.
    pub async fn contains(&self, product_id: &ProductId) -> Result<bool, WishlistError> {
        Ok(self.list().await?.iter().any(|p| &p.id == product_id))
    }

    /// Add `product` unless it is already present. Returns whether it was added.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Storage` if persistence fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: &Product) -> Result<bool, WishlistError> {
        let mut entries = self.list().await?;
        if entries.iter().any(|p| p.id == product.id) {
            return Ok(false);
        }
        entries.push(product.clone());
        self.persist(&entries).await?;
        Ok(true)
    }

    /// Flip membership of `product`. Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Storage` if persistence fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle(&self, product: &Product) -> Result<bool, WishlistError> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|p| p.id != product.id);

        let member = if entries.len() == before {
            entries.push(product.clone());
            true
        } else {
            false
        };

        self.persist(&entries).await?;
        tracing::info!(member, "Wishlist toggled");
        Ok(member)
    }

    /// Remove `product_id`. Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::Storage` if persistence fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<Vec<Product>, WishlistError> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|p| &p.id != product_id);
        if entries.len() != before {
            self.persist(&entries).await?;
        }
        Ok(entries)
    }

    /// Add one unit of a wishlisted product to `cart`, keeping the wishlist
    /// entry. Returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::NotFound` if the product is not wishlisted, or
    /// a storage error from either store.
    #[instrument(skip(self, cart))]
    pub async fn move_to_cart<C: DocumentStore>(
        &self,
        product_id: &ProductId,
        cart: &CartStore<'_, C>,
    ) -> Result<Vec<LineItem>, WishlistError> {
        let product = self
            .list()
            .await?
            .into_iter()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| WishlistError::NotFound(product_id.clone()))?;

        Ok(cart.add(&product, 1).await?)
    }

    async fn persist(&self, entries: &[Product]) -> Result<(), WishlistError> {
        storage::save(self.store, keys::WISHLIST_ITEMS, entries).await?;
        Ok(())
    }
}
