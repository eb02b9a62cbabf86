//! Clients for the remote catalog/order API.
//!
//! # Services
//!
//! - [`CatalogClient`] - product lookups, cached for 5 minutes
//! - [`OrderClient`] - order creation, implements [`OrderGateway`](crate::checkout::OrderGateway)
//! - [`UserClient`] - credential login
//!
//! # Demo mode
//!
//! The API is optional enrichment. When `STORE_API_URL` is unset, or the API
//! cannot be reached, every client falls back to local behavior: the built-in
//! demo catalog, locally synthesized orders and the demo identity. Only
//! definite answers from a reachable API (404, 401, validation failures) are
//! surfaced to callers.

mod api;
mod catalog;
mod orders;
mod users;

use serde::Serialize;
use thiserror::Error;

pub use api::StoreApiClient;
pub use catalog::CatalogClient;
pub use orders::OrderClient;
pub use users::UserClient;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No API base URL is configured.
    #[error("store API is not configured")]
    Offline,

    /// HTTP request failed (connection refused, timeout, reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The API answered with an unexpected status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ServiceError {
    /// Whether the failure means "the API is unreachable", which callers
    /// answer by falling back to demo behavior.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        match self {
            Self::Offline | Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::NotFound(_) | Self::Unauthorized(_) => false,
        }
    }
}

/// Reachability of the store API, as reported by its health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    /// Health check answered `{"status": "ok"}`.
    Online,
    /// The API answered, but not with a healthy status.
    Degraded,
    /// The API is unreachable or not configured; demo mode.
    Offline,
}

impl ApiStatus {
    /// Banner text for non-online states.
    #[must_use]
    pub const fn banner(self) -> Option<&'static str> {
        match self {
            Self::Online => None,
            Self::Degraded => Some("Server connection issue. Some features may be limited."),
            Self::Offline => Some(
                "Server is currently offline. Login and registration features may not work. \
                 Using demo mode with local storage only.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(ServiceError::Offline.is_connectivity());
        assert!(
            ServiceError::Api {
                status: 503,
                message: String::new()
            }
            .is_connectivity()
        );
        assert!(!ServiceError::NotFound("p1".to_string()).is_connectivity());
        assert!(
            !ServiceError::Api {
                status: 422,
                message: String::new()
            }
            .is_connectivity()
        );
    }

    #[test]
    fn test_banner_only_when_not_online() {
        assert!(ApiStatus::Online.banner().is_none());
        assert!(ApiStatus::Offline.banner().is_some_and(|b| b.contains("demo mode")));
        assert!(ApiStatus::Degraded.banner().is_some());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ApiStatus::Degraded).ok().as_deref(),
            Some("\"degraded\"")
        );
    }
}
