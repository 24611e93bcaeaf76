use std::sync::Arc;

use dispatch_desk::api;
use dispatch_desk::config::{Config, LogFormat};
use dispatch_desk::error::AppError;
use dispatch_desk::state::AppState;
use dispatch_desk::store::memory::MemoryStore;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false);
    match config.log_format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }

    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(
        store.clone(),
        store,
        config.store_timeout,
        config.event_buffer_size,
    ));

    let mut app = api::rest::router(state);
    if config.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        store_timeout_ms = config.store_timeout.as_millis() as u64,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
