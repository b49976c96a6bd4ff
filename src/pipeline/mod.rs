//! End-to-end scraping pipeline.
//!
//! One run owns one page session, processes listings strictly sequentially
//! with politeness delays between requests, contains per-listing failures,
//! and releases the session on every exit path.

use crate::config::Config;
use crate::extract::{
    ClassifyLevel, KeywordSets, LISTING_NODE_SELECTOR, ListingResult, RunStatistics, SummaryCard,
    extract_detail, ownership, parse_summaries,
};
use crate::extract::PageContent;
use crate::render::{PageRenderer, PageSession, RenderError};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

/// Inbound parameters of one run.
#[derive(Debug, Clone)]
pub struct ScrapeParams {
    pub limit: usize,
    pub zone: String,
    pub property_type: String,
    pub owner_only: bool,
}

/// Everything a finished run hands back.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub results: Vec<ListingResult>,
    pub stats: RunStatistics,
    pub filter_applied: String,
}

/// Run-level failures. Per-listing failures never surface here; they are
/// logged and the listing is dropped.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("invalid search base url: {0}")]
    BadBaseUrl(#[from] url::ParseError),
}

/// Drive a full scrape run. The session is closed before returning,
/// whatever the outcome.
#[instrument(skip_all, fields(zone = %params.zone, limit = params.limit, owner_only = params.owner_only))]
pub async fn run_scrape(
    renderer: &dyn PageRenderer,
    config: &Config,
    keywords: &KeywordSets,
    params: &ScrapeParams,
) -> Result<ScrapeOutcome, ScrapeError> {
    let mut session = renderer.open().await?;
    let outcome = run_with_session(session.as_mut(), config, keywords, params).await;
    session.close().await;
    outcome
}

async fn run_with_session(
    session: &mut dyn PageSession,
    config: &Config,
    keywords: &KeywordSets,
    params: &ScrapeParams,
) -> Result<ScrapeOutcome, ScrapeError> {
    let base_url = Url::parse(config.search_base_url())?;

    let cards = load_summaries(session, config, keywords, params, &base_url).await?;
    info!(candidates = cards.len(), "processing listing candidates");

    let mut results = Vec::new();
    for (index, card) in cards.iter().enumerate() {
        info!(
            "{}/{}: {}",
            index + 1,
            cards.len(),
            truncated_title(&card.listing.title)
        );

        match process_listing(session, config, keywords, params, card).await {
            Ok(Some(result)) => {
                info!(
                    phone = result.phone.as_deref().unwrap_or("ninguno"),
                    contact = %result.contact_name,
                    "listing extracted"
                );
                results.push(result);
            }
            Ok(None) => {
                info!(url = %card.listing.detail_url, "dropped by detail-level verification");
            }
            Err(err) => {
                warn!(url = %card.listing.detail_url, error = %err, "listing skipped");
            }
        }

        sleep(config.listing_delay()).await;
    }

    let stats = RunStatistics::from_results(&results);
    info!(
        with_phone = stats.with_phone,
        total = stats.total,
        success_rate = stats.success_rate,
        "run complete"
    );

    Ok(ScrapeOutcome {
        results,
        stats,
        filter_applied: filter_label(params.owner_only).to_string(),
    })
}

/// Load the search page and produce the candidate set.
///
/// In owner-only mode the owner-filtered URL is tried first; if the listing
/// selector never shows up there, the unfiltered search page is a degraded
/// fallback, not a failure. Over-fetches 2x the limit in owner-only mode to
/// compensate for the pre-filter.
async fn load_summaries(
    session: &mut dyn PageSession,
    config: &Config,
    keywords: &KeywordSets,
    params: &ScrapeParams,
    base_url: &Url,
) -> Result<Vec<SummaryCard>, ScrapeError> {
    let url = search_url(base_url, params, params.owner_only);
    session.navigate(&url, config.page_load_timeout()).await?;

    let waited = session
        .wait_for_selector(LISTING_NODE_SELECTOR, config.selector_timeout())
        .await;
    if let Err(err) = waited {
        if params.owner_only && err.is_recoverable() {
            warn!(error = %err, "no listings on owner-filtered page, falling back to unfiltered search");
            let fallback = search_url(base_url, params, false);
            session.navigate(&fallback, config.page_load_timeout()).await?;
            session
                .wait_for_selector(LISTING_NODE_SELECTOR, config.selector_timeout())
                .await?;
        } else if err.is_recoverable() {
            // Selector miss on the plain search page means no listings.
            warn!(error = %err, "no listings found");
            return Ok(Vec::new());
        } else {
            return Err(err.into());
        }
    }

    let markup = session.content()?;
    let page = PageContent::parse(&markup);

    let max = if params.owner_only {
        params.limit * 2
    } else {
        params.limit
    };
    let mut cards = parse_summaries(&page, base_url, max);

    if params.owner_only {
        let before = cards.len();
        cards.retain(|card| {
            ownership::classify(&card.card_text, keywords, ClassifyLevel::Summary)
        });
        cards.truncate(params.limit);
        info!(kept = cards.len(), scanned = before, "summary-level owner filter applied");
    }

    Ok(cards)
}

/// Process one listing. `Ok(None)` means the detail-level verification
/// rejected it in owner-only mode; errors mean fetch/render trouble and
/// lead to a logged skip upstream.
async fn process_listing(
    session: &mut dyn PageSession,
    config: &Config,
    keywords: &KeywordSets,
    params: &ScrapeParams,
    card: &SummaryCard,
) -> Result<Option<ListingResult>, RenderError> {
    session
        .navigate(&card.listing.detail_url, config.page_load_timeout())
        .await?;
    sleep(config.settle_delay()).await;

    let markup = session.content()?;
    let detail = extract_detail(&markup, keywords);

    if params.owner_only && !detail.owner_direct {
        return Ok(None);
    }

    Ok(Some(ListingResult::new(
        card.listing.clone(),
        detail.contact,
        detail.owner_direct,
    )))
}

fn search_url(base_url: &Url, params: &ScrapeParams, owner_filtered: bool) -> String {
    let mut path = format!(
        "/propiedades/venta/{}/{}",
        params.zone, params.property_type
    );
    if owner_filtered {
        path.push_str("/tipo-publicador-dueno");
    }
    path.push_str("/orden-masnuevas");
    base_url
        .join(&path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{base_url}{path}"))
}

fn filter_label(owner_only: bool) -> &'static str {
    if owner_only {
        "Dueños Directos"
    } else {
        "Todos los publicadores"
    }
}

fn truncated_title(title: &str) -> String {
    if title.chars().count() > 40 {
        let cut: String = title.chars().take(40).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests;
