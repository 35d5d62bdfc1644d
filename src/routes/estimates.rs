//! Cost estimation routes
//!
//! The estimate endpoint validates the body shape by hand so malformed
//! requests get a 400 naming the offending field, matching the contract the
//! deployed frontend already relies on.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::LineItem;
use crate::error::{ApiError, ApiResult};
use crate::estimator::{compute_estimate, PriceResolver};
use crate::middleware::request_id::RequestIdExt;

/// POST /cost-estimate
///
/// Compute a renovation cost estimate for the submitted line items.
pub async fn create_estimate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let (items, region_code) = parse_request(&body)?;

    tracing::info!(
        region_code = %region_code,
        items = items.len(),
        "Computing cost estimate"
    );

    let regional =
        resolve_regional_prices(&state, &region_code, &items, headers.request_id()).await;

    let resolver = match &regional {
        Some(prices) => PriceResolver::with_regional(&state.price_book, prices),
        None => PriceResolver::new(&state.price_book),
    };

    let estimate = compute_estimate(&items, &region_code, &resolver, &state.params)?;

    // Returned unwrapped: the deployed frontend consumes the estimate directly.
    Ok(Json(estimate))
}

/// Validate the request body shape: `items` must be an array of
/// `{name, quantity}` entries and `zipCode` must be a string.
fn parse_request(body: &Value) -> Result<(Vec<LineItem>, String), ApiError> {
    let raw_items = body
        .get("items")
        .ok_or_else(|| ApiError::InvalidInput("items is required".to_string()))?
        .as_array()
        .ok_or_else(|| ApiError::InvalidInput("items must be an array".to_string()))?;

    let region_code = body
        .get("zipCode")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ApiError::InvalidInput("zipCode is required and must be a string".to_string())
        })?
        .to_string();

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, raw) in raw_items.iter().enumerate() {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidInput(format!("items[{index}] is missing a name")))?;
        let quantity = raw.get("quantity").and_then(Value::as_f64).ok_or_else(|| {
            ApiError::InvalidInput(format!("item \"{name}\" is missing a numeric quantity"))
        })?;
        let unit = raw
            .get("unit")
            .and_then(Value::as_str)
            .map(|s| s.to_string());

        items.push(LineItem {
            name: name.to_string(),
            quantity,
            unit,
        });
    }

    Ok((items, region_code))
}

/// Consult the regional pricing service when configured. Any failure falls
/// back to the built-in price book.
async fn resolve_regional_prices(
    state: &AppState,
    region_code: &str,
    items: &[LineItem],
    request_id: Option<&str>,
) -> Option<HashMap<String, Decimal>> {
    let client = state.pricing.as_ref()?;
    let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();

    match client.regional_prices(region_code, &names, request_id).await {
        Ok(prices) => Some(prices),
        Err(e) => {
            tracing::warn!(
                error = %e,
                region_code = %region_code,
                "Regional price lookup failed; using built-in price book"
            );
            None
        }
    }
}

// ============================================================================
// Price book listing
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBookItem {
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBookResponse {
    pub default_unit_price: Decimal,
    pub items: Vec<PriceBookItem>,
}

/// GET /price-book
///
/// Read-only listing of the built-in unit prices.
pub async fn list_price_book(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let mut items: Vec<PriceBookItem> = state
        .price_book
        .entries()
        .iter()
        .map(|e| PriceBookItem {
            name: e.name.to_string(),
            unit: e.unit.to_string(),
            unit_price: e.unit_price,
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(DataResponse::new(PriceBookResponse {
        default_unit_price: state.price_book.default_unit_price(),
        items,
    })))
}
