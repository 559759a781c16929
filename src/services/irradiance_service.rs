use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::IrradianceConfig;
use crate::error::ProviderError;
use crate::models::quote::{DailyForecastResponse, IrradianceSample, IrradianceSource};

/// 1 MJ/m² = 0.278 kWh/m²
pub const MJ_TO_KWH: f64 = 0.278;
/// Floor applied to provider values (kWh/m²/day)
pub const MIN_PROVIDER_IRRADIANCE: f64 = 3.5;

/// Source of daily solar radiation for a coordinate pair.
#[async_trait]
pub trait IrradianceProvider: Send + Sync {
    /// Daily global radiation in MJ/m²/day.
    async fn daily_radiation_mj(&self, lat: f64, lng: f64) -> Result<f64, ProviderError>;
}

/// Daily shortwave radiation sum from Open-Meteo.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn forecast_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&daily=shortwave_radiation_sum&forecast_days=1&timezone=auto",
            self.base_url, lat, lng
        )
    }
}

#[async_trait]
impl IrradianceProvider for OpenMeteoProvider {
    async fn daily_radiation_mj(&self, lat: f64, lng: f64) -> Result<f64, ProviderError> {
        let url = self.forecast_url(lat, lng);
        debug!(url = %url, "irradiance request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.json::<DailyForecastResponse>().await?;
        mean_radiation(&body).ok_or(ProviderError::Empty)
    }
}

/// Mean of the non-null daily sums.
fn mean_radiation(body: &DailyForecastResponse) -> Option<f64> {
    let values: Vec<f64> = body
        .daily
        .shortwave_radiation_sum
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Latitude-band estimate (kWh/m²/day). Total: depends on latitude only.
pub fn fallback_irradiance(lat: f64) -> f64 {
    let abs_lat = lat.abs();
    if abs_lat < 15.0 {
        5.8 // tropical
    } else if abs_lat < 20.0 {
        5.2 // subtropical
    } else if abs_lat < 25.0 {
        4.8 // temperate
    } else {
        4.5
    }
}

/// Convert a provider reading to kWh/m²/day and apply the floor.
pub fn provider_to_kwh(mj_m2_day: f64) -> f64 {
    (mj_m2_day * MJ_TO_KWH).max(MIN_PROVIDER_IRRADIANCE)
}

/// Two-stage resolver: provider first, latitude band on any failure.
#[derive(Clone)]
pub struct IrradianceResolver {
    provider: Arc<dyn IrradianceProvider>,
    timeout: Duration,
}

impl IrradianceResolver {
    pub fn new(provider: Arc<dyn IrradianceProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolver backed by Open-Meteo, configured from `cfg`.
    pub fn from_config(client: Client, cfg: &IrradianceConfig) -> Self {
        Self::new(
            Arc::new(OpenMeteoProvider::new(client, &cfg.base_url)),
            Duration::from_millis(cfg.timeout_ms),
        )
    }

    /// Never fails. `offline` skips the network entirely.
    pub async fn resolve(&self, lat: f64, lng: f64, offline: bool) -> IrradianceSample {
        if !offline {
            match self.fetch(lat, lng).await {
                Ok(mj) => {
                    return IrradianceSample {
                        kwh_m2_day: provider_to_kwh(mj),
                        source: IrradianceSource::Provider,
                    };
                }
                Err(e) => warn!(lat, lng, error = %e, "irradiance provider failed, using latitude band"),
            }
        }

        let kwh_m2_day = fallback_irradiance(lat);
        debug!(lat, kwh_m2_day, offline, "latitude-band irradiance");
        IrradianceSample {
            kwh_m2_day,
            source: IrradianceSource::Fallback,
        }
    }

    async fn fetch(&self, lat: f64, lng: f64) -> Result<f64, ProviderError> {
        let mj = tokio::time::timeout(self.timeout, self.provider.daily_radiation_mj(lat, lng))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_millis() as u64))??;
        if !mj.is_finite() || mj < 0.0 {
            return Err(ProviderError::Empty);
        }
        Ok(mj)
    }
}
