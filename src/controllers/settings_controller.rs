use axum::{Json, extract::State};

use crate::controllers::json::ApiJson;
use crate::models::settings::{HealthStatus, OfflineMode};
use crate::shared_state::AppState;

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    let leads_stored = match state.leads.count().await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "lead store unavailable for health check");
            0
        }
    };
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        offline_mode: state.is_offline(),
        leads_stored,
    })
}

/// GET /api/settings/offline-mode
#[utoipa::path(
    get,
    path = "/api/settings/offline-mode",
    responses(
        (status = 200, description = "Current offline mode", body = OfflineMode)
    )
)]
pub async fn get_offline_mode(State(state): State<AppState>) -> Json<OfflineMode> {
    Json(OfflineMode { enabled: state.is_offline() })
}

/// POST /api/settings/offline-mode
/// Force latitude-band irradiance for every quote
#[utoipa::path(
    post,
    path = "/api/settings/offline-mode",
    request_body = OfflineMode,
    responses(
        (status = 200, description = "Offline mode updated", body = OfflineMode),
        (status = 422, description = "Malformed body", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_offline_mode(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OfflineMode>,
) -> Json<OfflineMode> {
    state.set_offline(body.enabled);
    tracing::info!(enabled = body.enabled, "offline mode changed");
    Json(OfflineMode { enabled: state.is_offline() })
}
