pub mod model;
pub mod ownership;
pub mod page;
pub mod phone;
pub mod summary;

#[cfg(test)]
mod tests;

pub use model::{ContactInfo, ExtractionStatus, ListingResult, ListingSummary, RunStatistics};
pub use ownership::{ClassifyLevel, KeywordSets};
pub use page::PageContent;
pub use summary::{LISTING_NODE_SELECTOR, SummaryCard, parse_summaries};

use model::DESCRIPTION_MAX_CHARS;

const CONTACT_NAME_SELECTORS: [&str; 3] = [
    r#"[data-qa*="contact"] span"#,
    ".contact-name",
    r#"[data-qa*="name"]"#,
];
const DESCRIPTION_SELECTOR: &str = r#"[data-qa="POSTING_DESCRIPTION"]"#;
const DEFAULT_CONTACT_NAME: &str = "Dueño directo";

/// Everything a detail page yields for one listing.
#[derive(Debug, Clone)]
pub struct DetailExtraction {
    pub owner_direct: bool,
    pub contact: ContactInfo,
}

/// Extract a contact record from a rendered detail page.
///
/// Classification runs over the full markup, the way the badge and agency
/// branding actually appear in the page (attributes included). A missing
/// phone is a valid outcome; the caller records it as a status flag.
pub fn extract_detail(markup: &str, keywords: &KeywordSets) -> DetailExtraction {
    let page = PageContent::parse(markup);

    let owner_direct = ownership::classify(page.full_markup(), keywords, ClassifyLevel::Detail);

    let phone = phone::extract_phone(&page).and_then(|raw| phone::normalize_phone(&raw));

    let contact_name = extract_contact_name(&page, keywords);

    let description = page
        .first_text(DESCRIPTION_SELECTOR)
        .map(|text| truncate_chars(&text, DESCRIPTION_MAX_CHARS))
        .unwrap_or_default();

    DetailExtraction {
        owner_direct,
        contact: ContactInfo {
            phone,
            contact_name,
            description,
        },
    }
}

/// First selector hit whose text is non-empty and free of agency branding.
fn extract_contact_name(page: &PageContent, keywords: &KeywordSets) -> String {
    for selector in CONTACT_NAME_SELECTORS {
        if let Some(name) = page.first_text(selector) {
            let lowered = name.to_lowercase();
            if !keywords
                .summary_agency
                .iter()
                .any(|brand| lowered.contains(brand.as_str()))
            {
                return name;
            }
        }
    }
    DEFAULT_CONTACT_NAME.to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
