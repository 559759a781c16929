//! Tests for the quote calculator endpoints

use std::sync::Arc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use solar_quote_api::build_router;
use solar_quote_api::error::ProviderError;
use solar_quote_api::services::irradiance_service::{IrradianceProvider, IrradianceResolver};
use solar_quote_api::services::lead_store::MemoryLeadStore;
use solar_quote_api::shared_state::AppState;
use tower::ServiceExt;

/// Provider returning a fixed MJ/m²/day reading, or failing when `None`.
struct StubProvider(Option<f64>);

#[async_trait]
impl IrradianceProvider for StubProvider {
    async fn daily_radiation_mj(&self, _lat: f64, _lng: f64) -> Result<f64, ProviderError> {
        self.0.ok_or(ProviderError::Status(503))
    }
}

fn create_test_router(reading: Option<f64>) -> Router {
    let resolver = IrradianceResolver::new(Arc::new(StubProvider(reading)), Duration::from_millis(200));
    let state = AppState::new(resolver, Arc::new(MemoryLeadStore::new()), false);
    build_router(state, None)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn santa_cruz_form(system: &str) -> Value {
    json!({
        "monthly_consumption": 300.0,
        "location": { "address": "Santa Cruz de la Sierra, Bolivia", "lat": -17.8146, "lng": -63.1561 },
        "panel_type": "monocrystalline",
        "system_type": system
    })
}

#[tokio::test]
async fn test_quote_with_provider_reading() {
    // 18 MJ/m²/day → 5.004 kWh/m²/day
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", santa_cruz_form("grid-tied")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["irradiance"]["source"], "provider");
    assert_abs_diff_eq!(body["irradiance"]["kwh_m2_day"].as_f64().unwrap(), 5.004, epsilon = 1e-9);
    assert_eq!(body["result"]["panels_needed"], 4);
    assert_eq!(body["panel_type"], "monocrystalline");
    assert_eq!(body["system_type"], "grid-tied");
    assert_eq!(body["location"]["address"], "Santa Cruz de la Sierra, Bolivia");
}

#[tokio::test]
async fn test_quote_falls_back_when_provider_fails() {
    let (status, body) = post_json(create_test_router(None), "/api/quotes", santa_cruz_form("off-grid")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["irradiance"]["source"], "fallback");
    assert_eq!(body["irradiance"]["kwh_m2_day"], 5.2);
    assert_eq!(body["result"]["technical_details"]["solar_radiation"], 5.2);
    assert!(body["result"]["savings"]["payback_period"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_quote_low_provider_reading_is_floored() {
    let (status, body) = post_json(create_test_router(Some(2.0)), "/api/quotes", santa_cruz_form("hybrid")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["irradiance"]["kwh_m2_day"], 3.5);
}

#[tokio::test]
async fn test_quote_missing_fields() {
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["monthly_consumption", "location", "panel_type", "system_type"] {
        assert!(body["fields"][field].is_string(), "missing error for {field}");
    }
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_quote_zero_consumption() {
    let mut form = santa_cruz_form("grid-tied");
    form["monthly_consumption"] = json!(0);
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["monthly_consumption"].is_string());
    assert!(body["fields"].get("panel_type").is_none());
}

#[tokio::test]
async fn test_quote_unknown_system() {
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", santa_cruz_form("island")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["system_type"].is_string());
}

#[tokio::test]
async fn test_quote_wrongly_typed_fields() {
    let mut form = santa_cruz_form("grid-tied");
    form["monthly_consumption"] = json!("300");
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["fields"]["monthly_consumption"].is_string());

    let mut form = santa_cruz_form("grid-tied");
    form["location"]["lat"] = json!("south");
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["location"].is_string());

    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", json!("quote")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["fields"]["body"].is_string());
}

#[tokio::test]
async fn test_quote_oversized_consumption() {
    let mut form = santa_cruz_form("hybrid");
    form["monthly_consumption"] = json!(1.0e300);
    let (status, body) = post_json(create_test_router(Some(18.0)), "/api/quotes", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["monthly_consumption"].is_string());
}

#[tokio::test]
async fn test_irradiance_endpoint() {
    let (status, body) = get_json(create_test_router(None), "/api/irradiance?lat=-22&lng=-60").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kwh_m2_day"], 4.8);
    assert_eq!(body["source"], "fallback");

    let (status, _) = get_json(create_test_router(None), "/api/irradiance?lat=120&lng=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_catalog_endpoint() {
    let (status, body) = get_json(create_test_router(None), "/api/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["panels"].as_array().unwrap().len(), 3);
    assert_eq!(body["panels"][0]["id"], "monocrystalline");
    assert_eq!(body["panels"][0]["power_kw"], 0.6);
    assert_eq!(body["systems"][2]["id"], "hybrid");
    assert_eq!(body["systems"][2]["multiplier"], 1.2);
}

#[tokio::test]
async fn test_offline_mode_forces_fallback() {
    let app = create_test_router(Some(30.0));

    let (status, body) = post_json(app.clone(), "/api/settings/offline-mode", json!({ "enabled": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], true);

    let (_, body) = get_json(app.clone(), "/api/settings/offline-mode").await;
    assert_eq!(body["enabled"], true);

    let (status, body) = post_json(app.clone(), "/api/quotes", santa_cruz_form("grid-tied")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["irradiance"]["source"], "fallback");

    let (_, body) = get_json(app, "/api/health").await;
    assert_eq!(body["offline_mode"], true);
    assert_eq!(body["status"], "ok");
}
