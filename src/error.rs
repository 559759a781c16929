//! Error types shared by the services and the HTTP layer.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Field name → user-facing message.
pub type FieldErrors = BTreeMap<String, String>;

/// Failures of the quote pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("invalid quote request ({} field(s))", .0.len())]
    Validation(FieldErrors),

    /// Only reachable through a bad irradiance or catalog value.
    #[error("computation error: {0}")]
    Computation(String),
}

/// Failures of the irradiance provider. Always absorbed by the resolver.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("provider returned no radiation data")]
    Empty,

    #[error("provider did not answer within {0} ms")]
    Timeout(u64),
}

/// Failures of the lead store. Surfaced to the user, never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("document store rejected the record with status {0}")]
    Rejected(u16),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Lead store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl From<QuoteError> for ApiError {
    fn from(e: QuoteError) -> Self {
        match e {
            QuoteError::Validation(fields) => ApiError::Validation(fields),
            QuoteError::Computation(msg) => ApiError::Internal(msg),
        }
    }
}

/// Prefix axum puts in front of a serde error in a `JsonDataError`.
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Top-level field named by a serde path such as `location.lat: invalid type`.
fn rejected_field(detail: &str) -> Option<(String, String)> {
    let (path, reason) = detail.split_once(": ")?;
    let field = path.split(['.', '[']).next()?;
    let is_path = !field.is_empty()
        && path.chars().all(|c| c.is_ascii_alphanumeric() || "_.[]".contains(c));
    is_path.then(|| (field.to_string(), reason.to_string()))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let detail = text.strip_prefix(DATA_ERROR_PREFIX);
        let (field, message) = match (&rejection, detail) {
            (JsonRejection::JsonDataError(_), Some(detail)) => {
                rejected_field(detail).unwrap_or_else(|| ("body".to_string(), detail.to_string()))
            }
            _ => ("body".to_string(), text),
        };
        ApiError::Validation(FieldErrors::from([(field, message)]))
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "SUBMIT_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please correct the highlighted fields".to_string(),
            Self::Conflict(msg) => msg.clone(),
            Self::Store(_) => "Your request could not be submitted, please try again later".to_string(),
            Self::Internal(_) => "The quote could not be calculated".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(e) => tracing::error!(error = %e, "Lead store error"),
            Self::Internal(e) => tracing::error!(error = %e, "Internal error"),
            _ => tracing::warn!(error = %self, "API error"),
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            fields: match self {
                Self::Validation(fields) => Some(fields),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
