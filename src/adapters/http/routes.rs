//! Top-level router assembly.

use ::http::{HeaderValue, Method};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::websocket::websocket_router;
use crate::config::ServerConfig;

use super::{health::health_router, HubState};

/// Build the full application router.
///
/// Mounts the WebSocket endpoint and the health check, then applies
/// tracing, request timeout and (if origins are configured) CORS layers.
pub fn app_router(state: HubState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(websocket_router())
        .merge(health_router())
        .with_state(state);

    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET]),
        );
    }

    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
}
