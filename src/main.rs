//! # timetally export server
//!
//! Serves the calendar export companion page: it loads configuration,
//! initializes logging and runs the HTTP router until shutdown.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetally::config::Config;
use timetally::export::server::ExportService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting timetally export server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - API: {}, timezone: {}, HTTP Port: {}",
        config.api_base_url,
        config.user_timezone.name(),
        config.http_port
    );

    let service = ExportService::new(config.user_timezone);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Calendar export server listening on port {}", config.http_port);

    if let Err(e) = axum::serve(listener, service.router).await {
        tracing::error!("Export server error: {}", e);
        return Err(anyhow::anyhow!("Export server error: {}", e));
    }

    info!("Application stopped");
    Ok(())
}
