//! Presigner API Server
//!
//! Main entry point for the presigned URL service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presigner_api::{AppState, create_router};
use presigner_core::metadata::{MetadataClient, MetadataConfig};
use presigner_core::presign::{PresignPolicy, PresignService};
use presigner_core::storage::{StorageConfig, StorageService};
use presigner_shared::{AppConfig, LogFormat};

const DEFAULT_LOG_FILTER: &str =
    "presigner_server=debug,presigner_api=debug,presigner_core=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration; the log format depends on it
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.log.format);

    // Storage adapter, verified before accepting traffic
    let storage = StorageService::from_config(StorageConfig::from(&config.storage))
        .context("AWS credentials validation failed")?;
    storage
        .validate_credentials()
        .await
        .context("AWS credentials validation failed")?;
    info!(
        default_region = %storage.config().default_region,
        "AWS credentials verified successfully"
    );

    // Metadata client
    let metadata = MetadataClient::new(MetadataConfig::from_settings(
        &config.metadata,
        config.presign.allowed_purposes.clone(),
    ))
    .context("Failed to build metadata client")?;
    info!(
        base_url = %config.metadata.base_url,
        schema = %config.metadata.schema,
        "Metadata client configured"
    );

    let presign = PresignService::new(
        Arc::new(metadata),
        Arc::new(storage),
        PresignPolicy {
            max_expires_in_secs: config.presign.max_expires_in_secs,
        },
    );

    let state = AppState::new(Arc::new(presign))
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs));
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Error starting server on {addr}"))?;
    info!("Server starting on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(());
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")??;
        }
        () = shutdown_signal() => {
            info!("Server is shutting down...");
            let _ = shutdown_tx.send(());

            let drain = Duration::from_secs(config.server.shutdown_timeout_secs);
            if let Ok(result) = tokio::time::timeout(drain, &mut server).await {
                result.context("server task panicked")??;
            } else {
                warn!(
                    timeout_secs = drain.as_secs(),
                    "In-flight requests did not drain in time, aborting"
                );
                server.abort();
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
