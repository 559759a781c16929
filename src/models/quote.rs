use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Panel technologies offered by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PanelTechnology {
    Monocrystalline,
    Polycrystalline,
    Bifacial,
}

/// Fixed per-technology constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PanelProfile {
    /// Rated power of a single panel (kW)
    pub power_kw: f64,
    /// Conversion efficiency [0..1]; descriptive only
    pub efficiency: f64,
    /// Module cost per watt (USD/W)
    pub cost_per_watt: f64,
}

impl PanelTechnology {
    pub const ALL: [PanelTechnology; 3] = [
        PanelTechnology::Monocrystalline,
        PanelTechnology::Polycrystalline,
        PanelTechnology::Bifacial,
    ];

    pub const fn profile(self) -> PanelProfile {
        match self {
            PanelTechnology::Monocrystalline => PanelProfile { power_kw: 0.6, efficiency: 0.22, cost_per_watt: 0.8 },
            PanelTechnology::Polycrystalline => PanelProfile { power_kw: 0.55, efficiency: 0.20, cost_per_watt: 0.7 },
            PanelTechnology::Bifacial        => PanelProfile { power_kw: 0.65, efficiency: 0.24, cost_per_watt: 0.9 },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PanelTechnology::Monocrystalline => "monocrystalline",
            PanelTechnology::Polycrystalline => "polycrystalline",
            PanelTechnology::Bifacial        => "bifacial",
        }
    }
}

/// System topology: decides whether storage is required and how the
/// whole bill is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SystemTopology {
    GridTied,
    OffGrid,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SystemProfile {
    /// Applied to the sum of every cost line
    pub multiplier: f64,
    /// Battery bank cost (USD), zero for grid-tied
    pub battery_cost: f64,
}

impl SystemTopology {
    pub const ALL: [SystemTopology; 3] = [
        SystemTopology::GridTied,
        SystemTopology::OffGrid,
        SystemTopology::Hybrid,
    ];

    pub const fn profile(self) -> SystemProfile {
        match self {
            SystemTopology::GridTied => SystemProfile { multiplier: 1.0, battery_cost: 0.0 },
            SystemTopology::OffGrid  => SystemProfile { multiplier: 1.3, battery_cost: 2000.0 },
            SystemTopology::Hybrid   => SystemProfile { multiplier: 1.2, battery_cost: 1500.0 },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SystemTopology::GridTied => "grid-tied",
            SystemTopology::OffGrid  => "off-grid",
            SystemTopology::Hybrid   => "hybrid",
        }
    }
}

/// Raised when a selector string does not name a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selector '{0}'")]
pub struct UnknownSelector(pub String);

impl FromStr for PanelTechnology {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelTechnology::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownSelector(s.to_string()))
    }
}

impl FromStr for SystemTopology {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemTopology::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownSelector(s.to_string()))
    }
}

impl fmt::Display for PanelTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SystemTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanelCatalogEntry {
    pub id: PanelTechnology,
    #[serde(flatten)]
    pub profile: PanelProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemCatalogEntry {
    pub id: SystemTopology,
    #[serde(flatten)]
    pub profile: SystemProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub panels: Vec<PanelCatalogEntry>,
    pub systems: Vec<SystemCatalogEntry>,
}

impl CatalogResponse {
    pub fn build() -> Self {
        Self {
            panels: PanelTechnology::ALL
                .into_iter()
                .map(|id| PanelCatalogEntry { id, profile: id.profile() })
                .collect(),
            systems: SystemTopology::ALL
                .into_iter()
                .map(|id| SystemCatalogEntry { id, profile: id.profile() })
                .collect(),
        }
    }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Map-picked location. The address is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Raw form body as posted by the calculator page. Every field is optional
/// so that missing inputs become per-field validation errors instead of a
/// body rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuoteForm {
    /// Monthly consumption (kWh/month)
    pub monthly_consumption: Option<f64>,
    pub location: Option<Location>,
    /// monocrystalline | polycrystalline | bifacial
    pub panel_type: Option<String>,
    /// grid-tied | off-grid | hybrid
    pub system_type: Option<String>,
}

/// A validated request: every field present, consumption > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub monthly_consumption_kwh: f64,
    pub location: Location,
    pub panel: PanelTechnology,
    pub system: SystemTopology,
}

// ─── Irradiance ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IrradianceSource {
    /// Live value from the weather provider
    Provider,
    /// Latitude-band estimate
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct IrradianceSample {
    /// kWh/m²/day
    pub kwh_m2_day: f64,
    pub source: IrradianceSource,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IrradianceQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Open-Meteo daily forecast payload (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct DailyForecastResponse {
    pub daily: DailyData,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    /// MJ/m² per day
    #[serde(default)]
    pub shortwave_radiation_sum: Vec<Option<f64>>,
}

// ─── Result ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CostBreakdown {
    pub panels: f64,
    pub inverter: f64,
    pub installation: f64,
    /// Balance of system plus battery bank
    pub additional: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Savings {
    pub monthly: f64,
    pub yearly: f64,
    /// Years to recoup the investment; null when there are no savings
    pub payback_period: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TechnicalDetails {
    /// Irradiance used (kWh/m²/day)
    pub solar_radiation: f64,
    pub system_efficiency: f64,
    pub inverter_efficiency: f64,
    pub performance_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Environmental {
    /// kg CO2 avoided per year
    pub co2_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuoteResult {
    pub panels_needed: u32,
    /// kW
    pub total_power: f64,
    /// kWh
    pub monthly_generation: f64,
    /// kWh
    pub yearly_generation: f64,
    pub system_cost: CostBreakdown,
    pub savings: Savings,
    pub technical_details: TechnicalDetails,
    pub environmental: Environmental,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub timestamp: DateTime<Utc>,
    pub panel_type: PanelTechnology,
    pub system_type: SystemTopology,
    pub location: Location,
    pub irradiance: IrradianceSample,
    pub result: QuoteResult,
}
