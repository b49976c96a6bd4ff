use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upper bound on the description carried in a result.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Constant recorded as the origin of every result.
pub const SOURCE: &str = "argenprop";

/// Compact listing data lifted from a search-results card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingSummary {
    pub detail_url: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub unique_id: String,
}

impl ListingSummary {
    /// Derive the stable id from the last path segment of the detail URL.
    ///
    /// The opaque random fallback is non-persistent and in practice
    /// unreachable: the summary parser drops cards without a detail link
    /// before ids are derived.
    pub fn derive_id(detail_url: &str) -> String {
        detail_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && !segment.contains(':'))
            .map(str::to_string)
            .unwrap_or_else(random_id)
    }
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

/// Seller contact data extracted from a detail page. Absence of a phone is
/// a valid outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub contact_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionStatus {
    Success,
    NoPhone,
}

/// One fully processed listing. Immutable once built; owned by the result
/// collection of a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingResult {
    #[serde(flatten)]
    pub summary: ListingSummary,
    pub phone: Option<String>,
    pub contact_name: String,
    pub description: String,
    pub owner_direct: bool,
    pub source: String,
    pub publisher_type: String,
    pub scraped_at: DateTime<Utc>,
    pub has_phone: bool,
    pub extraction_status: ExtractionStatus,
}

impl ListingResult {
    pub fn new(summary: ListingSummary, contact: ContactInfo, owner_direct: bool) -> Self {
        let has_phone = contact.phone.is_some();
        let publisher_type = if owner_direct {
            "Dueño Directo"
        } else {
            "Publicador"
        };
        Self {
            summary,
            phone: contact.phone,
            contact_name: contact.contact_name,
            description: contact.description,
            owner_direct,
            source: SOURCE.to_string(),
            publisher_type: publisher_type.to_string(),
            scraped_at: Utc::now(),
            has_phone,
            extraction_status: if has_phone {
                ExtractionStatus::Success
            } else {
                ExtractionStatus::NoPhone
            },
        }
    }
}

/// Aggregate numbers over one run's result collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RunStatistics {
    pub total: usize,
    pub with_phone: usize,
    pub success_rate: u32,
}

impl RunStatistics {
    pub fn from_results(results: &[ListingResult]) -> Self {
        let total = results.len();
        let with_phone = results.iter().filter(|r| r.has_phone).count();
        let success_rate = if total == 0 {
            0
        } else {
            ((with_phone as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            total,
            with_phone,
            success_rate,
        }
    }
}
