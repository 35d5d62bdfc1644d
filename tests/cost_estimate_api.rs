//! End-to-end tests for the cost estimation API, driving the full router.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use renovision_backend::app::{create_app, AppState};
use renovision_backend::config::{Environment, Settings};

fn test_settings() -> Settings {
    Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        platform_fee_rate: Decimal::new(10, 2),
        default_unit_price: Decimal::new(15000, 2),
        labor_hours: Decimal::from(8),
        labor_hourly_rate: Decimal::new(7000, 2),
        pricing_service_url: None,
        pricing_service_token: None,
        pricing_service_timeout_seconds: 10,
        pricing_cache_ttl_seconds: 3600,
    }
}

fn test_app() -> Router {
    create_app(AppState::new(test_settings(), None))
}

async fn request(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn post_estimate(body: Value) -> (StatusCode, Value) {
    request(test_app(), Method::POST, "/cost-estimate", Some(body)).await
}

#[tokio::test]
async fn paint_estimate_returns_published_totals() {
    let (status, body) = post_estimate(json!({
        "items": [{ "name": "paint", "quantity": 2 }],
        "zipCode": "94110"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMaterialCost"], json!("110.00"));
    assert_eq!(body["totalLaborCost"], json!("560.00"));
    assert_eq!(body["subtotal"], json!("670.00"));
    assert_eq!(body["platformFeePercent"], json!("10.00"));
    assert_eq!(body["platformFee"], json!("67.00"));
    assert_eq!(body["totalProjectCost"], json!("737.00"));
    assert_eq!(body["regionCode"], json!("94110"));
    assert_eq!(body["materials"][0]["item"], json!("paint"));
    assert_eq!(body["materials"][0]["unitCost"], json!("55.00"));
    assert_eq!(body["materials"][0]["totalCost"], json!("110.00"));
    assert_eq!(body["labor"][0]["totalCost"], json!("560.00"));
    assert!(body["notes"].as_str().unwrap().contains("Preliminary estimate"));
}

#[tokio::test]
async fn unknown_items_use_the_default_unit_price() {
    let (status, body) = post_estimate(json!({
        "items": [{ "name": "exotic marble", "quantity": 3 }],
        "zipCode": "10001"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["materials"][0]["unitCost"], json!("150.00"));
    assert_eq!(body["materials"][0]["totalCost"], json!("450.00"));
}

#[tokio::test]
async fn identical_requests_yield_identical_responses() {
    let payload = json!({
        "items": [
            { "name": "paint", "quantity": 2.5, "unit": "gallon" },
            { "name": "tile", "quantity": 120 }
        ],
        "zipCode": "30301"
    });

    let (_, first) = post_estimate(payload.clone()).await;
    let (_, second) = post_estimate(payload).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_items_are_rejected() {
    let (status, body) = post_estimate(json!({ "items": [], "zipCode": "10001" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));
    assert!(body["message"].as_str().unwrap().contains("non-empty"));
}

#[tokio::test]
async fn non_array_items_are_rejected() {
    let (status, body) =
        post_estimate(json!({ "items": "paint", "zipCode": "10001" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));
    assert!(body["message"].as_str().unwrap().contains("items must be an array"));
}

#[tokio::test]
async fn missing_zip_code_is_rejected() {
    let (status, body) =
        post_estimate(json!({ "items": [{ "name": "paint", "quantity": 1 }] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));
    assert!(body["message"].as_str().unwrap().contains("zipCode"));
}

#[tokio::test]
async fn non_string_zip_code_is_rejected() {
    let (status, body) = post_estimate(json!({
        "items": [{ "name": "paint", "quantity": 1 }],
        "zipCode": 94110
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));
}

#[tokio::test]
async fn negative_quantity_names_the_offending_item() {
    let (status, body) = post_estimate(json!({
        "items": [{ "name": "Modern Armchair", "quantity": -1 }],
        "zipCode": "10001"
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_INPUT"));
    assert!(body["message"].as_str().unwrap().contains("Modern Armchair"));
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let (status, _) = request(test_app(), Method::GET, "/cost-estimate", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_ok_without_a_pricing_service() {
    let (status, body) = request(test_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["services"]["pricing_service"], json!("not_configured"));
}

#[tokio::test]
async fn price_book_lists_builtin_entries() {
    let (status, body) = request(test_app(), Method::GET, "/price-book", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["defaultUnitPrice"], json!("150.00"));

    let items = body["data"]["items"].as_array().unwrap();
    let paint = items
        .iter()
        .find(|i| i["name"] == json!("paint"))
        .expect("paint should be listed");
    assert_eq!(paint["unitPrice"], json!("55.00"));
    assert_eq!(paint["unit"], json!("gallon"));
}
