//! Integration tests for Fashion Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fashion-store-integration-tests
//! ```
//!
//! No database or store API is needed: the router runs in demo mode over an
//! in-memory session store, and requests are driven with
//! [`tower::ServiceExt::oneshot`].
//!
//! # Test Categories
//!
//! - `storefront_*` - HTTP flows through the full router
//! - `library_*` - service-level flows over the document stores

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use fashion_store_storefront::config::StoreApiConfig;
use fashion_store_storefront::middleware::session_layer;
use fashion_store_storefront::routes;
use fashion_store_storefront::state::AppState;

/// API settings for tests: demo mode, orders are created immediately.
#[must_use]
pub fn demo_api() -> StoreApiConfig {
    StoreApiConfig {
        order_demo_delay: Duration::ZERO,
        ..StoreApiConfig::default()
    }
}

/// A router plus the session cookie of one browser.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

/// Status, headers and decoded body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body; plain-text bodies become a JSON string, empty ones `null`.
    pub body: Value,
}

impl TestResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Redirect target.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }
}

impl TestClient {
    /// Fresh app state and session store.
    ///
    /// # Panics
    ///
    /// Panics if the app state cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sessions(tower_sessions::MemoryStore::default())
    }

    /// Fresh app state over the given session backend.
    ///
    /// # Panics
    ///
    /// Panics if the app state cannot be built.
    #[must_use]
    pub fn with_sessions<S>(store: S) -> Self
    where
        S: tower_sessions::SessionStore + Clone,
    {
        let state = AppState::new(&demo_api()).expect("demo app state");
        Self {
            app: routes::app(state, session_layer(store, false)),
            cookie: None,
        }
    }

    /// Another browser on the same server.
    #[must_use]
    pub fn other_browser(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Another tab of this browser: same server, same session cookie.
    #[must_use]
    pub fn other_tab(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: self.cookie.clone(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, path, Some(body)).await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<&Value>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        // Keep the name=value part of the session cookie
        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
