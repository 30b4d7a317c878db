//! `flagpress serve` -- publish every configured distribution, then serve
//! them over HTTP until Ctrl+C.

use flagpress_server::DistributionHandler;

use crate::config::{load_flags, ServeConfig, DEFAULT_BIND, DEFAULT_PORT};

/// Publish all distributions in `config`, then bind and serve.
///
/// Any distribution that fails to load or compile aborts startup; the
/// server never comes up with a partial set.
pub async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let handler = DistributionHandler::new();

    for dist in &config.distributions {
        match &dist.flags {
            Some(path) => {
                let flags = load_flags(path)?;
                handler
                    .publish_with(&dist.key, &flags, dist.preferences())
                    .map_err(|e| format!("distribution '{}': {}", dist.key, e))?;
            }
            None => {
                handler.reserve(&dist.key)?;
                tracing::warn!(key = %dist.key, "no flags file; distribution reserved only");
            }
        }
    }

    if handler.registry().is_empty() {
        tracing::warn!("no distributions configured; every configuration request will 404");
    }

    let addr = format!(
        "{}:{}",
        config.bind.as_deref().unwrap_or(DEFAULT_BIND),
        config.port.unwrap_or(DEFAULT_PORT)
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        distributions = ?handler.registry().keys(),
        "flagpress listening"
    );

    axum::serve(listener, handler.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
