//! Form state around a single quote: the inputs, the last result, and the
//! per-field errors, with the `idle → computing → ready | failed` cycle.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{FieldErrors, QuoteError};
use crate::models::quote::{IrradianceSample, QuoteForm, QuoteRequest, QuoteResult};
use crate::services::irradiance_service::IrradianceResolver;
use crate::services::quote_calculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Idle,
    Computing,
    ResultReady,
    Failed,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("a quote is already being calculated")]
    InFlight,

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Owned by whoever initiated the request. Never shared between requests.
#[derive(Debug, Clone)]
pub struct QuoteSession {
    status: QuoteStatus,
    form: QuoteForm,
    completed: Option<CompletedQuote>,
    errors: FieldErrors,
}

/// Inputs and output of the last successful cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedQuote {
    pub request: QuoteRequest,
    pub irradiance: IrradianceSample,
    pub result: QuoteResult,
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSession {
    pub fn new() -> Self {
        Self {
            status: QuoteStatus::Idle,
            form: QuoteForm::default(),
            completed: None,
            errors: FieldErrors::new(),
        }
    }

    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    pub fn form(&self) -> &QuoteForm {
        &self.form
    }

    pub fn completed(&self) -> Option<&CompletedQuote> {
        self.completed.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Replace the inputs. Clears stale errors for the edited form.
    pub fn set_form(&mut self, form: QuoteForm) {
        self.form = form;
        self.errors.clear();
    }

    /// Validate the current form and enter `Computing`.
    ///
    /// Refused while a computation is already running. On a validation
    /// failure the session lands in `Failed` with no result.
    pub fn begin(&mut self) -> Result<QuoteRequest, SessionError> {
        if self.status == QuoteStatus::Computing {
            return Err(SessionError::InFlight);
        }
        self.completed = None;
        self.errors.clear();

        match quote_calculator::validate(&self.form) {
            Ok(req) => {
                self.status = QuoteStatus::Computing;
                Ok(req)
            }
            Err(e) => {
                self.fail(&e);
                Err(e.into())
            }
        }
    }

    /// Close the cycle opened by [`begin`](Self::begin).
    pub fn finish(
        &mut self,
        request: QuoteRequest,
        irradiance: IrradianceSample,
        outcome: Result<QuoteResult, QuoteError>,
    ) -> Result<&CompletedQuote, SessionError> {
        match outcome {
            Ok(result) => {
                self.status = QuoteStatus::ResultReady;
                Ok(self.completed.insert(CompletedQuote { request, irradiance, result }))
            }
            Err(e) => {
                self.fail(&e);
                Err(e.into())
            }
        }
    }

    /// Full cycle: validate, resolve irradiance, compute.
    pub async fn submit(
        &mut self,
        resolver: &IrradianceResolver,
        offline: bool,
    ) -> Result<&CompletedQuote, SessionError> {
        let req = self.begin()?;
        let sample = resolver
            .resolve(req.location.lat, req.location.lng, offline)
            .await;
        let outcome = quote_calculator::calculate(&req, sample.kwh_m2_day);
        self.finish(req, sample, outcome)
    }

    fn fail(&mut self, e: &QuoteError) {
        self.status = QuoteStatus::Failed;
        self.completed = None;
        self.errors = match e {
            QuoteError::Validation(fields) => fields.clone(),
            QuoteError::Computation(_) => {
                FieldErrors::from([("general".to_string(), "The quote could not be calculated".to_string())])
            }
        };
    }
}
