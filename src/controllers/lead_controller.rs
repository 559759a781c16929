use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::controllers::json::ApiJson;
use crate::error::{ApiResult, ErrorResponse};
use crate::models::lead::{LeadCreatedResponse, LeadRecord, LeadSubmission, SubmitterSession};
use crate::services::lead_service;
use crate::shared_state::AppState;

/// Session identity forwarded by the front end's auth layer.
fn session_from_headers(headers: &HeaderMap) -> SubmitterSession {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    SubmitterSession {
        user_id: header("x-user-id"),
        user_email: header("x-user-email"),
    }
}

/// POST /api/leads
/// Submit the contact form
///
/// Validates the submission and hands it to the lead store with status
/// `new`. A store failure is reported to the caller and not retried.
#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = LeadSubmission,
    params(
        ("x-user-id" = Option<String>, Header, description = "Signed-in user id"),
        ("x-user-email" = Option<String>, Header, description = "Signed-in user email")
    ),
    responses(
        (status = 201, description = "Lead stored", body = LeadCreatedResponse),
        (status = 422, description = "Validation error on the first invalid field", body = ErrorResponse),
        (status = 502, description = "Lead store unavailable", body = ErrorResponse)
    )
)]
pub async fn create_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(submission): ApiJson<LeadSubmission>,
) -> ApiResult<(StatusCode, Json<LeadCreatedResponse>)> {
    let record = lead_service::submit_lead(state.leads.as_ref(), submission, session_from_headers(&headers)).await?;
    Ok((
        StatusCode::CREATED,
        Json(LeadCreatedResponse {
            id: record.id,
            status: record.status,
            created_at: record.created_at,
        }),
    ))
}

/// GET /api/leads
/// List stored leads, newest first
#[utoipa::path(
    get,
    path = "/api/leads",
    responses(
        (status = 200, description = "Stored leads", body = Vec<LeadRecord>),
        (status = 502, description = "Lead store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_leads(State(state): State<AppState>) -> ApiResult<Json<Vec<LeadRecord>>> {
    Ok(Json(state.leads.list().await?))
}
