//! Cart store.
//!
//! Loads the `cartItems` document, applies one of the merge rules from
//! [`fashion_store_core::cart`] and writes the whole list back. Every mutation
//! is followed by a [`CartEvents::notify`].

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use fashion_store_core::{LineItem, Product, ProductId, cart};

use crate::events::CartEvents;
use crate::storage::{self, DocumentStore, StorageError, keys};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities are positive integers.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Cart operations over a document store.
pub struct CartStore<'a, S: DocumentStore> {
    store: &'a S,
    events: &'a CartEvents,
}

impl<'a, S: DocumentStore> CartStore<'a, S> {
    /// Create a cart store over `store`, notifying `events` on change.
    #[must_use]
    pub const fn new(store: &'a S, events: &'a CartEvents) -> Self {
        Self { store, events }
    }

    /// Current lines, read from storage.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the document cannot be read or decoded.
    pub async fn list(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(storage::load(self.store, keys::CART_ITEMS)
            .await?
            .unwrap_or_default())
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity, or
    /// `CartError::Storage` if persistence fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: &Product, quantity: u32) -> Result<Vec<LineItem>, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.list().await?;
        let total = cart::merge_add(&mut items, LineItem::from_product(product, quantity));
        self.persist(&items).await?;

        tracing::info!(quantity = total, "Added to cart");
        Ok(items)
    }

    /// Remove the line for `product_id`. Absent ids leave the lines as they
    /// were; the cart is still written back and listeners still notified.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if persistence fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<Vec<LineItem>, CartError> {
        let mut items = self.list().await?;
        if !cart::remove(&mut items, product_id) {
            tracing::debug!("Product not in cart");
        }
        self.persist(&items).await?;
        Ok(items)
    }

    /// Overwrite the quantity of an existing line. Stock is not checked.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity, or
    /// `CartError::Storage` if persistence fails.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.list().await?;
        if !cart::set_quantity(&mut items, product_id, quantity) {
            tracing::debug!("Product not in cart");
        }
        self.persist(&items).await?;
        Ok(items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if persistence fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        self.persist(&[]).await
    }

    /// Sum of quantities.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be read.
    pub async fn count(&self) -> Result<u64, CartError> {
        Ok(cart::count(&self.list().await?))
    }

    /// Sum of line totals at full precision. Round when formatting.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be read.
    pub async fn subtotal(&self) -> Result<Decimal, CartError> {
        Ok(cart::subtotal(&self.list().await?))
    }

    async fn persist(&self, items: &[LineItem]) -> Result<(), CartError> {
        storage::save(self.store, keys::CART_ITEMS, items).await?;
        self.events.notify();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::product;

    #[tokio::test]
    async fn test_add_same_product_merges() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let cart = CartStore::new(&store, &events);

        cart.add(&product("p1", 500, 10), 1).await.unwrap();
        let items = cart.add(&product("p1", 500, 10), 2).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(cart.count().await.unwrap(), 3);
        assert_eq!(events.sent(), 2);
    }

    #[tokio::test]
    async fn test_add_zero_is_rejected() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let cart = CartStore::new(&store, &events);
        assert!(matches!(
            cart.add(&product("p1", 500, 10), 0).await,
            Err(CartError::InvalidQuantity)
        ));
        assert_eq!(events.sent(), 0);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let cart = CartStore::new(&store, &events);
        cart.add(&product("p1", 500, 10), 1).await.unwrap();
        cart.add(&product("p2", 300, 10), 2).await.unwrap();
        let before = cart.list().await.unwrap();

        let after = cart.remove(&ProductId::new("missing")).await.unwrap();
        assert_eq!(after, before);
        assert_eq!(cart.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_quantity_and_count() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let cart = CartStore::new(&store, &events);
        cart.add(&product("p1", 100, 10), 1).await.unwrap();
        cart.add(&product("p2", 100, 10), 1).await.unwrap();

        cart.set_quantity(&ProductId::new("p1"), 2).await.unwrap();
        cart.set_quantity(&ProductId::new("p2"), 3).await.unwrap();
        assert_eq!(cart.count().await.unwrap(), 5);
        assert_eq!(cart.subtotal().await.unwrap(), Decimal::new(500, 0));
    }

    #[tokio::test]
    async fn test_independent_stores_see_latest_state() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let writer = CartStore::new(&store, &events);
        let reader = CartStore::new(&store, &events);

        writer.add(&product("p1", 100, 10), 4).await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_clear_empties_and_signals() {
        let store = MemoryStore::new();
        let events = CartEvents::new();
        let cart = CartStore::new(&store, &events);
        cart.add(&product("p1", 100, 10), 4).await.unwrap();
        cart.clear().await.unwrap();
        assert_eq!(cart.count().await.unwrap(), 0);
        assert_eq!(events.sent(), 2);
    }

    proptest! {
        #[test]
        fn prop_adds_accumulate(adds in proptest::collection::vec(1u32..10, 1..15)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let quantity = runtime.block_on(async {
                let store = MemoryStore::new();
                let events = CartEvents::new();
                let cart = CartStore::new(&store, &events);
                let p = product("p1", 250, 3);
                for n in &adds {
                    cart.add(&p, *n).await.unwrap();
                }
                cart.list().await.unwrap()[0].quantity
            });
            prop_assert_eq!(quantity, adds.iter().sum::<u32>());
        }
    }
}
