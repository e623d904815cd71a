//! Health endpoint.
//!
//! Route: `GET /health`

use axum::{extract::State, routing::get, Json};
use serde::Serialize;

use super::HubState;

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
    pub pending_rebroadcasts: usize,
}

pub async fn health(State(state): State<HubState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.hub.session_count().await,
        pending_rebroadcasts: state.hub.pending_rebroadcasts().len(),
    })
}

pub fn health_router() -> axum::Router<HubState> {
    axum::Router::new().route("/health", get(health))
}
