//! Transit REST HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::ports::TransitDataProvider;
use infrastructure::{AppConfig, CachingProvider, TransitAdapter, init_logging};
use integration_transit::HafasTransitClient;
use presentation_http::{AppState, create_router};
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.server)?;

    info!(
        name = %config.api.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting transit REST server"
    );

    let profile = config
        .transit
        .profile()
        .map_err(|e| anyhow::anyhow!("Invalid transit profile: {e}"))?;
    let client = HafasTransitClient::new(&config.transit.to_transit_config())?;
    let adapter = TransitAdapter::new(client, profile);

    let provider: Arc<dyn TransitDataProvider> = if config.cache.enabled {
        info!(
            ttl_secs = config.cache.ttl_secs,
            max_entries = config.cache.max_entries,
            "Provider cache enabled"
        );
        Arc::new(CachingProvider::new(
            adapter,
            config.cache.ttl(),
            config.cache.max_entries,
        ))
    } else {
        Arc::new(adapter)
    };

    let state = AppState::new(provider, config.api.clone())?;
    info!(routes = state.routes.len(), "Route table assembled");
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr}");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal(shutdown_timeout).await;
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => result?,
        () = drain_deadline(shutdown_rx, shutdown_timeout) => {
            warn!("Connections still open after {:?}, closing them", shutdown_timeout);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    info!("Waiting up to {:?} for connections to close", timeout);
}

/// Resolves `timeout` after shutdown was signalled; never resolves otherwise
async fn drain_deadline(mut shutdown: watch::Receiver<bool>, timeout: Duration) {
    if shutdown.wait_for(|signalled| *signalled).await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(timeout).await;
}
