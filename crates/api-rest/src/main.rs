//! Standalone REST API server binary.
//!
//! Useful for development when only the REST surface (with OpenAPI/Swagger UI) is wanted. The
//! workspace's main `pama-run` binary also loads `.env` before starting the same router.

use pama_core::{CoreConfig, PamaImagingService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the PAMA REST API server.
///
/// # Environment Variables
/// - `PAMA_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PAMA_CONSULT_METHOD`, `PAMA_APP_URL`, `PAMA_APP_LABEL`, `PAMA_GUIDELINES_FILE`,
///   `PAMA_RECOMMENDATIONS_FILE`: see [`CoreConfig::from_env_values`]
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or rule files are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PAMA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_env_values(
        std::env::var("PAMA_CONSULT_METHOD").ok(),
        std::env::var("PAMA_APP_URL").ok(),
        std::env::var("PAMA_APP_LABEL").ok(),
        std::env::var("PAMA_GUIDELINES_FILE").ok(),
        std::env::var("PAMA_RECOMMENDATIONS_FILE").ok(),
    )?);
    let service = PamaImagingService::new(cfg)?;

    tracing::info!("-- Starting PAMA REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::router(service)).await?;

    Ok(())
}
