use axum::{
    Json,
    extract::{Query, State},
};

use crate::controllers::json::ApiJson;
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::models::quote::{CatalogResponse, IrradianceQuery, IrradianceSample, QuoteForm, QuoteResponse};
use crate::services::quote_session::{QuoteSession, SessionError};
use crate::shared_state::AppState;

/// POST /api/quotes
/// Estimate a photovoltaic system
///
/// Validates the form, resolves the site irradiance (provider, or the
/// latitude band when the provider is unavailable) and returns the sized
/// system with its cost, savings and environmental figures.
#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = QuoteForm,
    responses(
        (status = 200, description = "Quote estimate", body = QuoteResponse),
        (status = 422, description = "Per-field validation errors", body = ErrorResponse),
        (status = 500, description = "Quote could not be calculated", body = ErrorResponse)
    )
)]
pub async fn create_quote(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<QuoteForm>,
) -> ApiResult<Json<QuoteResponse>> {
    let mut session = QuoteSession::new();
    session.set_form(form);

    let done = session
        .submit(&state.resolver, state.is_offline())
        .await
        .map_err(|e| match e {
            SessionError::InFlight => ApiError::Conflict(SessionError::InFlight.to_string()),
            SessionError::Quote(q) => ApiError::from(q),
        })?
        .clone();

    tracing::info!(
        panel = %done.request.panel,
        system = %done.request.system,
        panels = done.result.panels_needed,
        source = ?done.irradiance.source,
        "quote calculated"
    );

    Ok(Json(QuoteResponse {
        timestamp: chrono::Utc::now(),
        panel_type: done.request.panel,
        system_type: done.request.system,
        location: done.request.location,
        irradiance: done.irradiance,
        result: done.result,
    }))
}

/// GET /api/irradiance
/// Resolve irradiance for a coordinate pair
#[utoipa::path(
    get,
    path = "/api/irradiance",
    params(IrradianceQuery),
    responses(
        (status = 200, description = "Irradiance used for quotes at this location", body = IrradianceSample),
        (status = 422, description = "Coordinates out of range", body = ErrorResponse)
    )
)]
pub async fn get_irradiance(
    State(state): State<AppState>,
    Query(q): Query<IrradianceQuery>,
) -> ApiResult<Json<IrradianceSample>> {
    if !(-90.0..=90.0).contains(&q.lat) || !(-180.0..=180.0).contains(&q.lng) {
        return Err(ApiError::Validation(
            [("location".to_string(), "Coordinates are out of range".to_string())].into(),
        ));
    }
    Ok(Json(state.resolver.resolve(q.lat, q.lng, state.is_offline()).await))
}

/// GET /api/catalog
/// Panel technologies and system topologies with their constants
#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Selectable panels and systems", body = CatalogResponse)
    )
)]
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::build())
}
