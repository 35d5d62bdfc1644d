use anyhow::Result;

use renovision_backend::services::RegionalPricingClient;
use renovision_backend::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting renovision backend"
    );

    // Create the regional pricing client when a delegate is configured
    let pricing = match settings.pricing_service_url.as_deref() {
        Some(url) => {
            let client = RegionalPricingClient::new(
                url,
                settings.pricing_service_token.as_deref(),
                settings.pricing_service_timeout_seconds,
                settings.pricing_cache_ttl_seconds,
            )?;

            // Optionally check pricing service health (non-blocking)
            tokio::spawn({
                let client = client.clone();
                async move {
                    match client.health_check().await {
                        Ok(()) => tracing::info!("Pricing service is healthy"),
                        Err(e) => tracing::warn!(
                            error = %e,
                            "Pricing service health check failed - estimates will use the built-in price book"
                        ),
                    }
                }
            });

            Some(client)
        }
        None => {
            tracing::info!("No regional pricing service configured; using built-in price book");
            None
        }
    };

    // Create application state
    let state = app::AppState::new(settings.clone(), pricing);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
