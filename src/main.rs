//! Broadcast Hub server binary.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use broadcast_hub::adapters::http::{app_router, HubState};
use broadcast_hub::adapters::websocket::BROADCAST_PATH;
use broadcast_hub::adapters::{InMemorySessionRegistry, TokioDelayScheduler};
use broadcast_hub::application::BroadcastHub;
use broadcast_hub::config::{AppConfig, ServerConfig};
use broadcast_hub::ports::DelayScheduler;

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let registry = Arc::new(InMemorySessionRegistry::new());
    let scheduler = Arc::new(TokioDelayScheduler::new());
    let hub = Arc::new(BroadcastHub::new(
        registry,
        scheduler.clone(),
        config.hub.to_settings(),
    ));

    let app = app_router(HubState::new(hub), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        path = BROADCAST_PATH,
        rebroadcast_delay_ms = config.hub.rebroadcast_delay_ms,
        "Broadcast hub listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.cancel_all();
    tracing::info!("Broadcast hub stopped");
    Ok(())
}
