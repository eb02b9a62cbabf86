//! Credential login and registration against `/api/users`.

use serde::Serialize;
use tracing::instrument;

use fashion_store_core::{Email, Registration, UserInfo};

use super::{ServiceError, StoreApiClient};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Client for account operations.
#[derive(Clone)]
pub struct UserClient {
    api: StoreApiClient,
}

impl UserClient {
    #[must_use]
    pub const fn new(api: StoreApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for an identity.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` for rejected credentials, or a
    /// connectivity error (see [`ServiceError::is_connectivity`]) when the
    /// API cannot be reached.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<UserInfo, ServiceError> {
        let request = LoginRequest {
            email: email.as_str(),
            password,
        };
        self.api
            .post_json(&["api", "users", "login"], &request, None)
            .await
    }

    /// Like [`login`](Self::login), but an unreachable API signs in the demo
    /// identity for `email` so checkout stays usable offline.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` for rejected credentials, or any
    /// other definite API failure.
    pub async fn login_or_demo(&self, email: &Email, password: &str) -> Result<UserInfo, ServiceError> {
        match self.login(email, password).await {
            Err(e) if e.is_connectivity() => {
                tracing::warn!(error = %e, "Store API unreachable, signing in demo user");
                Ok(UserInfo::demo(Some(email.clone())))
            }
            other => other,
        }
    }

    /// Create an account and return its identity.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` when the API refuses the account (for
    /// example an email already in use), or a connectivity error when the API
    /// cannot be reached.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<UserInfo, ServiceError> {
        let request = RegisterRequest {
            name: &registration.name,
            email: registration.email.as_str(),
            password: &registration.password,
        };
        self.api
            .post_json(&["api", "users", "register"], &request, None)
            .await
    }

    /// Like [`register`](Self::register), but an unreachable API signs in a
    /// demo identity carrying the submitted name and email.
    ///
    /// # Errors
    ///
    /// Returns any definite API failure.
    pub async fn register_or_demo(&self, registration: &Registration) -> Result<UserInfo, ServiceError> {
        match self.register(registration).await {
            Err(e) if e.is_connectivity() => {
                tracing::warn!(error = %e, "Store API unreachable, registering demo user");
                let mut user = UserInfo::demo(Some(registration.email.clone()));
                user.name.clone_from(&registration.name);
                Ok(user)
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_offline_is_connectivity_error() {
        let client = UserClient::new(StoreApiClient::offline());
        let err = client
            .login(&Email::parse("jane@example.com").unwrap(), "123456")
            .await
            .unwrap_err();
        assert!(err.is_connectivity());
    }

    #[tokio::test]
    async fn test_login_or_demo_offline_signs_in_demo_user() {
        let client = UserClient::new(StoreApiClient::offline());
        let user = client
            .login_or_demo(&Email::parse("jane@example.com").unwrap(), "123456")
            .await
            .unwrap();
        assert!(user.is_demo());
        assert_eq!(user.email.as_str(), "jane@example.com");
    }

    fn registration() -> Registration {
        Registration {
            name: "Asha Rao".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            password: "secret1".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_offline_is_connectivity_error() {
        let client = UserClient::new(StoreApiClient::offline());
        let err = client.register(&registration()).await.unwrap_err();
        assert!(err.is_connectivity());
    }

    #[tokio::test]
    async fn test_register_or_demo_keeps_name_and_email() {
        let client = UserClient::new(StoreApiClient::offline());
        let user = client.register_or_demo(&registration()).await.unwrap();
        assert!(user.is_demo());
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.email.as_str(), "asha@example.com");
    }
}
