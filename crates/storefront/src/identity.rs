//! Signed-in identity, persisted under `userInfo`.

use fashion_store_core::UserInfo;

use crate::storage::{self, DocumentStore, StorageError, keys};

/// Reads and writes the signed-in identity.
pub struct IdentityStore<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> IdentityStore<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The signed-in identity, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be read or decoded.
    pub async fn current(&self) -> Result<Option<UserInfo>, StorageError> {
        storage::load(self.store, keys::USER_INFO).await
    }

    /// Record `user` as signed in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persistence fails.
    pub async fn sign_in(&self, user: &UserInfo) -> Result<(), StorageError> {
        storage::save(self.store, keys::USER_INFO, user).await?;
        tracing::info!(user_id = %user.id, demo = user.is_demo(), "Signed in");
        Ok(())
    }

    /// Forget the signed-in identity. Cart, wishlist and checkout data stay.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persistence fails.
    pub async fn sign_out(&self) -> Result<(), StorageError> {
        self.store.remove(keys::USER_INFO).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let store = MemoryStore::new();
        let identity = IdentityStore::new(&store);
        assert!(identity.current().await.unwrap().is_none());

        identity.sign_in(&UserInfo::demo(None)).await.unwrap();
        let user = identity.current().await.unwrap().unwrap();
        assert!(user.is_demo());

        identity.sign_out().await.unwrap();
        assert!(identity.current().await.unwrap().is_none());
    }
}
