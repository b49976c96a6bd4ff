use super::*;
use crate::fetcher::FetchError;
use crate::render::{MockPageRenderer, PageRenderer, PageSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const BASE: &str = "https://test.example";

/// In-memory renderer serving canned pages by exact URL.
struct FakeRenderer {
    pages: Arc<HashMap<String, String>>,
    closed: Arc<AtomicBool>,
}

impl FakeRenderer {
    fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages: Arc::new(pages),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn open(&self) -> Result<Box<dyn PageSession>, RenderError> {
        Ok(Box::new(FakeSession {
            pages: Arc::clone(&self.pages),
            current: None,
            closed: Arc::clone(&self.closed),
        }))
    }

    fn engine(&self) -> &'static str {
        "fake"
    }
}

struct FakeSession {
    pages: Arc<HashMap<String, String>>,
    current: Option<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), RenderError> {
        match self.pages.get(url) {
            Some(body) => {
                self.current = Some(body.clone());
                Ok(())
            }
            None => Err(RenderError::Navigation(FetchError::RequestTimeout)),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), RenderError> {
        let body = self.current.as_deref().ok_or(RenderError::NoPage)?;
        let page = PageContent::parse(body);
        if page.fragments(selector).is_empty() {
            Err(RenderError::SelectorTimeout {
                selector: selector.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn content(&self) -> Result<String, RenderError> {
        self.current.clone().ok_or(RenderError::NoPage)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn test_config() -> Config {
    Config::default()
        .with_search_base_url(BASE)
        .without_delays()
}

fn params(limit: usize, owner_only: bool) -> ScrapeParams {
    ScrapeParams {
        limit,
        zone: "capital-federal".to_string(),
        property_type: "1-dormitorio".to_string(),
        owner_only,
    }
}

fn owner_search_url() -> String {
    format!("{BASE}/propiedades/venta/capital-federal/1-dormitorio/tipo-publicador-dueno/orden-masnuevas")
}

fn plain_search_url() -> String {
    format!("{BASE}/propiedades/venta/capital-federal/1-dormitorio/orden-masnuevas")
}

fn card(n: usize, blurb: &str) -> String {
    format!(
        r#"<article data-qa="posting PROPERTY">
             <a href="/propiedades/aviso-{n}--{n}">Ver</a>
             <h2>Aviso {n}</h2>
             <span data-qa="POSTING_CARD_PRICE">USD 90.000</span>
             <span data-qa="POSTING_CARD_LOCATION">Capital Federal</span>
             <p>{blurb}</p>
           </article>"#
    )
}

fn search_page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.join("\n"))
}

fn detail_url(n: usize) -> String {
    format!("{BASE}/propiedades/aviso-{n}--{n}")
}

fn owner_detail(phone: Option<&str>) -> String {
    let phone_block = phone
        .map(|p| format!(r#"<div data-qa="phone-box">{p}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>
             <span class="badge">Dueño directo</span>
             {phone_block}
             <section data-qa="POSTING_DESCRIPTION">Venta de particular.</section>
           </body></html>"#
    )
}

fn agency_detail() -> String {
    r#"<html><body>
         <p>Inmobiliaria Central, propietario representado.</p>
         <div data-qa="phone-box">(11) 9999-0000</div>
       </body></html>"#
        .to_string()
}

#[tokio::test]
async fn owner_only_run_prefilters_and_reverifies() {
    // 10 cards on the owner-filtered page: 3 look owner-direct, 7 are
    // agency-branded. Of the 3, one fails detail-level verification.
    let mut cards = Vec::new();
    for n in 1..=3 {
        cards.push(card(n, "Vende dueño directo"));
    }
    for n in 4..=10 {
        cards.push(card(n, "Inmobiliaria Zentro ofrece"));
    }

    let mut pages = HashMap::new();
    pages.insert(owner_search_url(), search_page(&cards));
    pages.insert(detail_url(1), owner_detail(Some("(11) 1234-5678")));
    pages.insert(detail_url(2), owner_detail(None));
    pages.insert(detail_url(3), agency_detail());

    let renderer = FakeRenderer::new(pages);
    let outcome = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(5, true),
    )
    .await
    .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(
        outcome.results[0].phone.as_deref(),
        Some("+5491112345678")
    );
    assert_eq!(outcome.results[1].phone, None);
    assert_eq!(outcome.stats.total, 2);
    assert_eq!(outcome.stats.with_phone, 1);
    assert_eq!(outcome.stats.success_rate, 50);
    assert_eq!(outcome.filter_applied, "Dueños Directos");
    assert!(renderer.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn owner_page_without_listings_falls_back_to_unfiltered_search() {
    let mut pages = HashMap::new();
    pages.insert(
        owner_search_url(),
        "<html><body><p>Sin resultados</p></body></html>".to_string(),
    );
    pages.insert(
        plain_search_url(),
        search_page(&[card(1, "Vende dueño directo"), card(2, "Propietario vende")]),
    );
    pages.insert(detail_url(1), owner_detail(Some("4321-8765")));
    pages.insert(detail_url(2), owner_detail(None));

    let renderer = FakeRenderer::new(pages);
    let outcome = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(5, true),
    )
    .await
    .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(
        outcome.results[0].phone.as_deref(),
        Some("+5491143218765")
    );
}

#[tokio::test]
async fn failed_detail_fetch_skips_listing_without_aborting_run() {
    let mut pages = HashMap::new();
    pages.insert(
        owner_search_url(),
        search_page(&[card(1, "Vende dueño directo"), card(2, "Vende dueño directo")]),
    );
    // Listing 1's detail page is unreachable; listing 2 works.
    pages.insert(detail_url(2), owner_detail(Some("(11) 1234-5678")));

    let renderer = FakeRenderer::new(pages);
    let outcome = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(5, true),
    )
    .await
    .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].summary.unique_id, "aviso-2--2");
}

#[tokio::test]
async fn generic_run_keeps_agency_listings() {
    let mut pages = HashMap::new();
    pages.insert(
        plain_search_url(),
        search_page(&[card(1, "Inmobiliaria Zentro ofrece")]),
    );
    pages.insert(detail_url(1), agency_detail());

    let renderer = FakeRenderer::new(pages);
    let outcome = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(3, false),
    )
    .await
    .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert!(!outcome.results[0].owner_direct);
    assert_eq!(outcome.results[0].publisher_type, "Publicador");
    assert_eq!(outcome.filter_applied, "Todos los publicadores");
}

#[tokio::test]
async fn no_listings_on_generic_search_yields_empty_outcome() {
    let mut pages = HashMap::new();
    pages.insert(
        plain_search_url(),
        "<html><body><p>Sin resultados</p></body></html>".to_string(),
    );

    let renderer = FakeRenderer::new(pages);
    let outcome = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(3, false),
    )
    .await
    .unwrap();

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.stats.total, 0);
    assert_eq!(outcome.stats.success_rate, 0);
}

#[tokio::test]
async fn search_navigation_failure_is_fatal_and_still_closes_session() {
    // No pages at all: the very first navigation fails.
    let renderer = FakeRenderer::new(HashMap::new());
    let result = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(3, true),
    )
    .await;

    assert!(matches!(result, Err(ScrapeError::Render(_))));
    assert!(renderer.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn session_acquisition_failure_surfaces_as_run_error() {
    let mut renderer = MockPageRenderer::new();
    renderer
        .expect_open()
        .returning(|| Err(RenderError::SessionClosed));

    let result = run_scrape(
        &renderer,
        &test_config(),
        &KeywordSets::default(),
        &params(3, true),
    )
    .await;

    assert!(matches!(result, Err(ScrapeError::Render(RenderError::SessionClosed))));
}
