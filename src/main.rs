//! Main entry point for the TravelBot Gateway

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use travelbot_gateway::{api, config::Settings, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }

    info!("Starting TravelBot Gateway");
    if let Err(e) = dotenv {
        warn!(error = %e, "No .env file loaded");
    }

    settings.validate()?;
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        model = %settings.chat.model,
        cache_token = settings.flights.cache_token,
        "Loaded configuration"
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState::from_settings(settings)?);
    let app = api::routes::create_router(app_state)?;

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
