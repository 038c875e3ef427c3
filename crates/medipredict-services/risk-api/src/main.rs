use medipredict_risk_api::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });
    config.validate()?;

    let _guard = mp_tracing::init(config.tracing_config())?;

    info!(
        app = %config.app.name,
        version = %config.app.version,
        debug = config.app.debug,
        "Starting risk API"
    );

    let addr = config.server_address();
    let state = Arc::new(AppState::new(config));

    info!("Creating router...");
    let app = create_router(state)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
