//! Health check handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::services::ApiStatus;
use crate::state::AppState;

/// Readiness response.
#[derive(Debug, Serialize)]
pub struct ReadinessView {
    pub api: ApiStatus,
    /// Banner shown while the store API is degraded or offline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<&'static str>,
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Always answers 200: the storefront keeps working in demo mode while the
/// store API is down, so the status is reported rather than enforced.
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessView> {
    let api = state.api().health().await;
    Json(ReadinessView {
        api,
        banner: api.banner(),
    })
}
