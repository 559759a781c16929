use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use solar_quote_api::build_router;
use solar_quote_api::config::Config;
use solar_quote_api::logging::init_logging;
use solar_quote_api::services::irradiance_service::IrradianceResolver;
use solar_quote_api::services::lead_store::{HttpLeadStore, LeadStore, MemoryLeadStore};
use solar_quote_api::shared_state::AppState;

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SOLAR_QUOTE_CONFIG").ok())
        .unwrap_or_else(|| "config.json".to_string());
    let (config, found) = match Config::load_or_default(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    };

    // 2. Logging
    init_logging(&config.logging);
    if found {
        tracing::info!(path = %path, "Configuration loaded");
    } else {
        tracing::warn!(path = %path, "Config file not found, using defaults");
    }

    // 3. Collaborators
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(config.irradiance.timeout_ms))
        .user_agent(format!("solar-quote-api/{}", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP client");
            std::process::exit(1);
        }
    };

    let resolver = IrradianceResolver::from_config(client.clone(), &config.irradiance);
    let leads: Arc<dyn LeadStore> = match &config.lead_store.endpoint {
        Some(endpoint) => Arc::new(HttpLeadStore::new(client, endpoint)),
        None => {
            tracing::info!("No lead store endpoint configured, keeping leads in memory");
            Arc::new(MemoryLeadStore::new())
        }
    };

    let state = AppState::new(resolver, leads, config.offline_mode);

    // 4. Start Axum HTTP server
    let app = build_router(state, config.server.static_dir.as_deref());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("API Server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);
    if config.offline_mode {
        tracing::info!("Offline mode enabled: quotes use latitude-band irradiance");
    }

    if let Err(e) = axum_server::bind(addr).serve(app.into_make_service()).await {
        tracing::error!(error = %e, "HTTP server stopped");
        std::process::exit(1);
    }
}
