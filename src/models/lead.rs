use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::quote::UnknownSelector;

/// Customer sector, as offered by the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Public,
    Agriculture,
    Residential,
    Commercial,
    Industrial,
}

impl FromStr for Sector {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Sector::Public),
            "agriculture" => Ok(Sector::Agriculture),
            "residential" => Ok(Sector::Residential),
            "commercial" => Ok(Sector::Commercial),
            "industrial" => Ok(Sector::Industrial),
            other => Err(UnknownSelector(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    /// Building-integrated photovoltaics
    Bipv,
    Photovoltaic,
    Wind,
}

impl FromStr for GenerationType {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bipv" => Ok(GenerationType::Bipv),
            "photovoltaic" => Ok(GenerationType::Photovoltaic),
            "wind" => Ok(GenerationType::Wind),
            other => Err(UnknownSelector(other.to_string())),
        }
    }
}

fn default_country_code() -> String {
    "BO".to_string()
}

/// Contact form body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// ISO 3166-1 alpha-2
    #[serde(default = "default_country_code")]
    pub phone_country_code: String,
    /// Digits only
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub generation_type: String,
    #[serde(default)]
    pub message: String,
}

/// Who submitted the lead, when known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitterSession {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
}

/// Document handed to the lead store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeadRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// "+{calling code} {number}"
    pub phone: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub city: String,
    pub sector: Sector,
    pub generation_type: GenerationType,
    pub message: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: LeadStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadCreatedResponse {
    pub id: Uuid,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}
