//! Search-results page parsing.

use crate::extract::model::ListingSummary;
use crate::extract::page::PageContent;
use tracing::debug;
use url::Url;

/// Listing card node on a search-results page. The pipeline also waits on
/// this selector after navigation.
pub const LISTING_NODE_SELECTOR: &str = r#"article[data-qa="posting PROPERTY"]"#;

const DETAIL_LINK_SELECTOR: &str = r#"a[href*="/propiedades/"]"#;
const PRICE_SELECTOR: &str = r#"[data-qa="POSTING_CARD_PRICE"]"#;
const LOCATION_SELECTOR: &str = r#"[data-qa="POSTING_CARD_LOCATION"]"#;

const DEFAULT_TITLE: &str = "Sin título";
const DEFAULT_PRICE: &str = "Consultar";
const DEFAULT_LOCATION: &str = "Sin ubicación";

/// A parsed card: the summary plus the card's full text, kept so the
/// orchestrator can run the summary-level ownership heuristic without
/// re-visiting the document.
#[derive(Debug, Clone)]
pub struct SummaryCard {
    pub listing: ListingSummary,
    pub card_text: String,
}

/// Single pass over the page's listing nodes in document order, truncated
/// to `max_count`. Cards without a resolvable detail link are dropped; that
/// is a hard filter, not an error.
pub fn parse_summaries(page: &PageContent, base_url: &Url, max_count: usize) -> Vec<SummaryCard> {
    let cards: Vec<SummaryCard> = page
        .fragments(LISTING_NODE_SELECTOR)
        .iter()
        .filter_map(|node| {
            let href = node.first_attr(DETAIL_LINK_SELECTOR, "href")?;
            let detail_url = base_url.join(&href).ok()?.to_string();

            let listing = ListingSummary {
                unique_id: ListingSummary::derive_id(&detail_url),
                detail_url,
                title: node
                    .first_text("h2")
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                price: node
                    .first_text(PRICE_SELECTOR)
                    .unwrap_or_else(|| DEFAULT_PRICE.to_string()),
                location: node
                    .first_text(LOCATION_SELECTOR)
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            };
            Some(SummaryCard {
                listing,
                card_text: node.text(),
            })
        })
        .take(max_count)
        .collect();

    debug!(count = cards.len(), "parsed listing summaries");
    cards
}
