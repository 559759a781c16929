use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::lead_controller::{create_lead, list_leads};
use crate::controllers::quote_controller::{create_quote, get_catalog, get_irradiance};
use crate::controllers::settings_controller::{get_health, get_offline_mode, set_offline_mode};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Quote calculator
        .route("/quotes",                  post(create_quote))
        .route("/irradiance",              get(get_irradiance))
        .route("/catalog",                 get(get_catalog))
        // Contact form
        .route("/leads",                   post(create_lead).get(list_leads))
        // Settings
        .route("/settings/offline-mode",   get(get_offline_mode).post(set_offline_mode))
        .route("/health",                  get(get_health))
        .with_state(state)
}
