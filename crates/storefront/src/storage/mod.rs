//! Keyed JSON document persistence.
//!
//! Every piece of shopper state (cart, wishlist, shipping address, payment
//! method, latest order, signed-in identity) lives under a well-known key in a
//! [`DocumentStore`]. Stores built on top of it never cache: each operation
//! reads the current document, so independent callers always see the latest
//! write.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests
//! - [`FileStore`] - one `<key>.json` file per key, used by the CLI
//! - [`SessionStore`] - a `tower-sessions` session, used by the HTTP server

mod file;
mod memory;
mod session;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::SessionStore;

/// Well-known document keys.
pub mod keys {
    /// Array of cart line items.
    pub const CART_ITEMS: &str = "cartItems";

    /// Array of wishlisted product snapshots.
    pub const WISHLIST_ITEMS: &str = "wishlistItems";

    /// Validated shipping address.
    pub const SHIPPING_ADDRESS: &str = "shippingAddress";

    /// Selected payment method.
    pub const PAYMENT_METHOD: &str = "paymentMethod";

    /// Most recently placed order.
    pub const LATEST_ORDER: &str = "latestOrder";

    /// Signed-in identity.
    pub const USER_INFO: &str = "userInfo";

    /// Every key, in the order they are listed above.
    pub const ALL: [&str; 6] = [
        CART_ITEMS,
        WISHLIST_ITEMS,
        SHIPPING_ADDRESS,
        PAYMENT_METHOD,
        LATEST_ORDER,
        USER_INFO,
    ];
}

/// Errors raised by persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value could not be encoded for storage.
    #[error("failed to serialize {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored document does not have the expected shape.
    #[error("corrupt document under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A key → JSON document store.
///
/// A `set` either replaces the whole document or leaves the previous one in
/// place; backends never expose a partially written value.
pub trait DocumentStore: Send + Sync {
    /// Read the document under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Replace the document under `key`.
    fn set(&self, key: &str, value: Value)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the document under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Commit buffered writes to the backend.
    ///
    /// Stores that write through on every `set` have nothing to do here.
    fn flush(&self) -> impl Future<Output = Result<(), StorageError>> + Send {
        async { Ok(()) }
    }
}

/// Read and decode the document under `key`.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the document does not decode as `T`,
/// or whatever the backend reports.
pub async fn load<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };

    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

/// Encode `value` and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or whatever the
/// backend reports.
pub async fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: DocumentStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| StorageError::Serialization {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, value).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = load(&store, keys::CART_ITEMS).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        save(&store, keys::PAYMENT_METHOD, "Stripe").await.unwrap();
        let value: Option<String> = load(&store, keys::PAYMENT_METHOD).await.unwrap();
        assert_eq!(value.as_deref(), Some("Stripe"));
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_corrupt() {
        let store = MemoryStore::new();
        store
            .set(keys::CART_ITEMS, json!({"not": "an array"}))
            .await
            .unwrap();
        let err = load::<Vec<String>, _>(&store, keys::CART_ITEMS)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "cartItems"));
    }

    #[test]
    fn test_keys_are_distinct() {
        let mut all = keys::ALL.to_vec();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), keys::ALL.len());
    }
}
