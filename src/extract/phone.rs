//! Phone extraction and normalization for Argentine mobile numbers.

use crate::extract::page::PageContent;
use once_cell::sync::Lazy;
use regex::Regex;

/// Element strategies, in priority order: phone-marked, contact-marked,
/// `tel:` links, WhatsApp links.
const ELEMENT_SELECTORS: [&str; 4] = [
    r#"[data-qa*="phone"]"#,
    r#"[data-qa*="contact"]"#,
    r#"a[href^="tel:"]"#,
    r#"a[href*="wa.me"]"#,
];

/// Optional +54(9) country code, optional (11)/(15) area block, then two
/// groups of four digits.
static ELEMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+54\s*9?\s*)?(\(?1[15]\)?\s*)?(\d{4}[\s-]?\d{4})").unwrap()
});

/// Raw-markup fallbacks, most specific first.
static MARKUP_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\+54\s*9?\s*11\s*\d{4}[\s-]?\d{4}").unwrap(),
        Regex::new(r"\(?11\)?\s*\d{4}[\s-]?\d{4}").unwrap(),
        Regex::new(r"15\s*\d{4}[\s-]?\d{4}").unwrap(),
    ]
});

/// Scan a detail page for the first phone-shaped substring.
///
/// Elements are inspected in document order within each selector, selectors
/// in listed order; the first match short-circuits everything after it. If
/// no marked element yields a match, the full markup is scanned with the
/// fallback patterns.
pub fn extract_phone(page: &PageContent) -> Option<String> {
    for selector in ELEMENT_SELECTORS {
        for node in page.fragments(selector) {
            let text = node.text();
            let haystack = if text.is_empty() {
                node.attr("href").unwrap_or_default().to_string()
            } else {
                text
            };
            if let Some(found) = ELEMENT_PATTERN.find(&haystack) {
                return Some(found.as_str().to_string());
            }
        }
    }

    let markup = page.full_markup();
    MARKUP_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(markup))
        .map(|found| found.as_str().to_string())
}

/// Normalize a raw match to `+549…` canonical form.
///
/// Strips every non-digit and applies prefix rules in order. Returns `None`
/// when no rule fits; that is a miss, not an error. This is a one-way
/// transform over the digit string: feeding a canonical `+549…` value back
/// in re-enters through its `54` digits, not through the `+`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.starts_with("54") {
        Some(format!("+{digits}"))
    } else if digits.starts_with("11") && digits.len() == 10 {
        Some(format!("+549{digits}"))
    } else if digits.len() == 8 {
        Some(format!("+54911{digits}"))
    } else {
        None
    }
}
