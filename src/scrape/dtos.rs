use crate::extract::{ListingResult, RunStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_limit() -> u32 {
    10
}
fn default_zone() -> String {
    "capital-federal".to_string()
}
fn default_property_type() -> String {
    "1-dormitorio".to_string()
}
fn default_owner_only() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_zone")]
    pub zone: String,
    #[serde(default = "default_property_type")]
    pub property_type: String,
    #[serde(default = "default_owner_only")]
    pub owner_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: Vec<ListingResult>,
    pub stats: RunStatistics,
    pub filter_applied: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}
