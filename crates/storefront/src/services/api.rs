//! Shared HTTP plumbing for the store API.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{ApiStatus, ServiceError};
use crate::config::StoreApiConfig;

/// Thin JSON client bound to the configured API base URL.
///
/// Cheap to clone. With no base URL every request fails with
/// `ServiceError::Offline` without touching the network.
#[derive(Clone)]
pub struct StoreApiClient {
    inner: Arc<StoreApiClientInner>,
}

struct StoreApiClientInner {
    client: reqwest::Client,
    base_url: Option<Url>,
}

#[derive(serde::Deserialize)]
struct HealthResponse {
    status: String,
}

impl StoreApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Http` if the HTTP client cannot be built.
    pub fn new(config: &StoreApiConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(StoreApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Client that never contacts a server.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            inner: Arc::new(StoreApiClientInner {
                client: reqwest::Client::new(),
                base_url: None,
            }),
        }
    }

    /// Whether an API base URL is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.base_url.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.inner.base_url.clone().ok_or(ServiceError::Offline)?;
        url.path_segments_mut()
            .map_err(|()| ServiceError::Offline)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the request fails, the status is not a
    /// success, or the body does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ServiceError> {
        let url = self.endpoint(segments)?;
        let response = self.inner.client.get(url).send().await?;
        Self::decode(response).await
    }

    /// `POST` a JSON body, optionally with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the request fails, the status is not a
    /// success, or the body does not decode.
    pub async fn post_json<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.inner.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
        let status = response.status();
        let path = response.url().path().to_owned();

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(path));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ServiceError::Unauthorized(api_message(&body)));
        }
        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Store API returned non-success status"
            );
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse store API response"
            );
            ServiceError::Parse(e)
        })
    }

    /// Probe `GET /api/healthcheck`.
    #[instrument(skip(self))]
    pub async fn health(&self) -> ApiStatus {
        match self.get_json::<HealthResponse>(&["api", "healthcheck"]).await {
            Ok(health) if health.status == "ok" => ApiStatus::Online,
            Ok(_) => ApiStatus::Degraded,
            Err(e) if e.is_connectivity() => {
                tracing::debug!(error = %e, "Store API offline");
                ApiStatus::Offline
            }
            Err(e) => {
                tracing::warn!(error = %e, "Store API health check failed");
                ApiStatus::Degraded
            }
        }
    }
}

/// Pull `message` out of an `{"message": ...}` error body, if present.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
