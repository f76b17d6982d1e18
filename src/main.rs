use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pama_core::{CoreConfig, PamaImagingService};

/// Main entry point for the PAMA imaging service
///
/// Loads `.env`, resolves the core configuration once and serves the CDS Hooks REST API.
///
/// # Environment Variables
/// - `PAMA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PAMA_CONSULT_METHOD`: consult-method marker (default: "example-gcode")
/// - `PAMA_APP_URL`, `PAMA_APP_LABEL`: SMART app linked from cards
/// - `PAMA_GUIDELINES_FILE`, `PAMA_RECOMMENDATIONS_FILE`: rule file overrides
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, rule loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pama=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PAMA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_env_values(
        std::env::var("PAMA_CONSULT_METHOD").ok(),
        std::env::var("PAMA_APP_URL").ok(),
        std::env::var("PAMA_APP_LABEL").ok(),
        std::env::var("PAMA_GUIDELINES_FILE").ok(),
        std::env::var("PAMA_RECOMMENDATIONS_FILE").ok(),
    )?);
    let service = PamaImagingService::new(cfg)?;

    tracing::info!("++ Starting PAMA REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(service)).await?;

    Ok(())
}
