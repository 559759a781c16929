use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

pub fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("solar_quote_api={lvl},tower_http={lvl},warn", lvl = cfg.level).into()
    });

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if cfg.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }

    tracing::info!(level = %cfg.level, json = cfg.json, "Logging initialized");
}
