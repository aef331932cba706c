//! Health check handler

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::forbid_caching;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Is the transit data provider answering?
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let ok = state.provider.is_healthy().await;
    let status = if ok {
        StatusCode::OK
    } else {
        warn!("Health check failed, provider is not healthy");
        StatusCode::BAD_GATEWAY
    };

    let mut headers = HeaderMap::new();
    forbid_caching(&mut headers);
    (status, headers, Json(HealthResponse { ok }))
}
