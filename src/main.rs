use axum::Router;
use tokio::net::TcpListener;

use anyhow::anyhow;

use frontdesk::{AppState, ServerConfig, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Load configuration
    let config = ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;
    let address = config.address();

    // Create application state
    let app_state = AppState::new(config);

    let app: Router = routes::api::create_api_router().with_state(app_state.clone());

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    tracing::info!("Server listening on {address}");

    // Start server; Ctrl-C triggers a graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Kill any bots still serving sessions before exit
    app_state.bots.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
    }
}
