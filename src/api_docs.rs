use utoipa::OpenApi;
use crate::controllers::{lead_controller, quote_controller, settings_controller};
use crate::error;
use crate::models::{lead, quote, settings};
use crate::services::quote_session;

#[derive(OpenApi)]
#[openapi(
    paths(
        quote_controller::create_quote,
        quote_controller::get_irradiance,
        quote_controller::get_catalog,
        lead_controller::create_lead,
        lead_controller::list_leads,
        settings_controller::get_health,
        settings_controller::get_offline_mode,
        settings_controller::set_offline_mode
    ),
    components(
        schemas(
            quote::QuoteForm,
            quote::Location,
            quote::QuoteResponse,
            quote::QuoteResult,
            quote::IrradianceSample,
            quote::CatalogResponse,
            quote::PanelTechnology,
            quote::SystemTopology,
            quote_session::QuoteStatus,
            lead::LeadSubmission,
            lead::LeadRecord,
            lead::LeadCreatedResponse,
            settings::HealthStatus,
            settings::OfflineMode,
            error::ErrorResponse
        )
    ),
    tags(
        (name = "solar-quote-api", description = "Photovoltaic quote calculator and contact-form API")
    )
)]
pub struct ApiDoc;
