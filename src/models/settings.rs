use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── REST API response types ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub offline_mode: bool,
    pub leads_stored: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OfflineMode {
    /// When true, quotes use the latitude-band irradiance only
    pub enabled: bool,
}
