//! Photovoltaic quote calculator and contact-form backend.
//!
//! The quote pipeline resolves site irradiance (Open-Meteo, with a
//! latitude-band fallback) and sizes and prices a PV system from a fixed
//! catalog of panels and system topologies.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

use axum::{Router, response::Html, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::routes::api_routes::api_routes;
use crate::shared_state::AppState;

/// Full application router: `/api`, the Scalar UI, and an optional static
/// site fallback.
pub fn build_router(state: AppState, static_dir: Option<&str>) -> Router {
    let router = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}
