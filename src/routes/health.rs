use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub pricing_service: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    // The pricing delegate is optional; estimates fall back to the built-in
    // price book when it is down, so a failing probe only degrades status.
    let (status, pricing_status) = match &state.pricing {
        Some(client) => match client.health_check().await {
            Ok(()) => ("healthy", "ok"),
            Err(_) => ("degraded", "error"),
        },
        None => ("healthy", "not_configured"),
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                pricing_service: pricing_status.to_string(),
            },
        }),
    )
}
