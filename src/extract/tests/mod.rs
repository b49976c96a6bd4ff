use std::fs;
use url::Url;

use crate::extract::{
    ClassifyLevel, ExtractionStatus, KeywordSets, ListingResult, PageContent, extract_detail,
    ownership, parse_summaries,
};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extract/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn base_url() -> Url {
    Url::parse("https://www.argenprop.com").unwrap()
}

#[test]
fn search_page_yields_linked_cards_only() {
    let page = PageContent::parse(&fixture("search_results.html"));
    let cards = parse_summaries(&page, &base_url(), 10);

    // Four cards on the page, one without a detail link.
    assert_eq!(cards.len(), 3);
    assert_eq!(
        cards[0].listing.detail_url,
        "https://www.argenprop.com/propiedades/depto-2-amb-caballito--14250001"
    );
    assert_eq!(cards[0].listing.unique_id, "depto-2-amb-caballito--14250001");
    assert_eq!(cards[0].listing.price, "USD 98.000");
    assert_eq!(cards[2].listing.price, "Consultar");
}

#[test]
fn summary_heuristic_splits_owner_and_agency_cards() {
    let page = PageContent::parse(&fixture("search_results.html"));
    let cards = parse_summaries(&page, &base_url(), 10);
    let keywords = KeywordSets::default();

    let verdicts: Vec<bool> = cards
        .iter()
        .map(|card| ownership::classify(&card.card_text, &keywords, ClassifyLevel::Summary))
        .collect();

    // Caballito (dueño directo) passes, Palermo (inmobiliaria) fails,
    // Almagro (propietario) passes.
    assert_eq!(verdicts, vec![true, false, true]);
}

#[test]
fn owner_detail_page_extracts_full_contact() {
    let keywords = KeywordSets::default();
    let detail = extract_detail(&fixture("detail_owner.html"), &keywords);

    assert!(detail.owner_direct);
    assert_eq!(detail.contact.phone.as_deref(), Some("+5491143218765"));
    assert_eq!(detail.contact.contact_name, "Marta Quiroga");
    assert!(detail.contact.description.starts_with("Departamento de dos ambientes"));
    assert!(detail.contact.description.chars().count() <= 200);
}

#[test]
fn agency_branding_vetoes_owner_keyword() {
    let keywords = KeywordSets::default();
    let detail = extract_detail(&fixture("detail_agency.html"), &keywords);

    // "propietario" appears in the description, but the agency branding wins.
    assert!(!detail.owner_direct);
    // Branded contact name is rejected in favor of the placeholder.
    assert_eq!(detail.contact.contact_name, "Dueño directo");
}

#[test]
fn missing_phone_is_a_status_not_an_error() {
    let keywords = KeywordSets::default();
    let detail = extract_detail(&fixture("detail_no_phone.html"), &keywords);

    assert!(detail.owner_direct);
    assert_eq!(detail.contact.phone, None);

    let page = PageContent::parse(&fixture("search_results.html"));
    let cards = parse_summaries(&page, &base_url(), 10);
    let result = ListingResult::new(cards[2].listing.clone(), detail.contact, detail.owner_direct);
    assert!(!result.has_phone);
    assert_eq!(result.extraction_status, ExtractionStatus::NoPhone);
    assert_eq!(result.source, "argenprop");
}
