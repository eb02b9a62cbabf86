//! Document store backed by an HTTP session.
//!
//! One browser session is one store: each document key becomes a session
//! key, persisted by whatever session store the `SessionManagerLayer` uses
//! (`PostgreSQL` in production, memory in tests).

use serde_json::Value;
use tower_sessions::Session;

use super::{DocumentStore, StorageError};

/// Wraps a `tower_sessions::Session` as a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Session id, once the session has been persisted.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session.id().map(|id| id.to_string())
    }
}

impl From<tower_sessions::session::Error> for StorageError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl DocumentStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.session.get_value(key).await?)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.session.insert_value(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session.remove_value(key).await?;
        Ok(())
    }

    /// Writes the session record now instead of when the response leaves the
    /// session layer.
    async fn flush(&self) -> Result<(), StorageError> {
        self.session.save().await?;
        Ok(())
    }
}
