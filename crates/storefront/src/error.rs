//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Responses are JSON: `{"error": "..."}`, plus `"fields"` for validation
//! failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use fashion_store_core::FieldErrors;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::services::ServiceError;
use crate::storage::StorageError;
use crate::wishlist::WishlistError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input failed validation, per field.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated or credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Reading or writing shopper state failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// The store API failed in a way demo mode cannot cover.
    #[error("Service error: {0}")]
    Connectivity(ServiceError),

    /// The request conflicts with current state (step locked, order pending).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => Self::NotFound(what),
            ServiceError::Unauthorized(message) => Self::Unauthorized(message),
            other => Self::Connectivity(other),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity => Self::BadRequest(err.to_string()),
            CartError::Storage(e) => Self::Persistence(e),
        }
    }
}

impl From<WishlistError> for AppError {
    fn from(err: WishlistError) -> Self {
        match err {
            WishlistError::NotFound(id) => Self::NotFound(format!("wishlist entry {id}")),
            WishlistError::Cart(e) => e.into(),
            WishlistError::Storage(e) => Self::Persistence(e),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(fields) => Self::Validation(fields),
            CheckoutError::StepLocked(_) | CheckoutError::EmptyCart | CheckoutError::InFlight => {
                Self::Conflict(err.to_string())
            }
            CheckoutError::OrderNotFound(id) => Self::NotFound(format!("order {id}")),
            CheckoutError::Gateway(e) => e.into(),
            CheckoutError::Cart(e) => e.into(),
            CheckoutError::Storage(e) => Self::Persistence(e),
        }
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Connectivity(_) => StatusCode::BAD_GATEWAY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Persistence(_) | Self::Internal(_) | Self::Connectivity(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(fields) => json!({
                "error": "Please correct the highlighted fields",
                "fields": fields,
            }),
            Self::Persistence(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            Self::Connectivity(_) => json!({ "error": "Store service unavailable" }),
            Self::NotFound(what) => json!({ "error": format!("Not found: {what}") }),
            Self::Unauthorized(message) | Self::Conflict(message) | Self::BadRequest(message) => {
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use fashion_store_core::{CheckoutStep, OrderId};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        let mut fields = FieldErrors::default();
        fields.add("city", "City is required");

        assert_eq!(
            get_status(AppError::Validation(fields)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Persistence(StorageError::Backend("disk".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Connectivity(ServiceError::Offline)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_service_errors_map_to_client_statuses() {
        assert!(matches!(
            AppError::from(ServiceError::NotFound("9".to_string())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::Unauthorized("bad".to_string())),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_checkout_errors_map() {
        assert!(matches!(
            AppError::from(CheckoutError::StepLocked(CheckoutStep::Shipping)),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(CheckoutError::InFlight),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(CheckoutError::OrderNotFound(OrderId::new("x"))),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(CartError::InvalidQuantity),
            AppError::BadRequest(_)
        ));
    }
}
