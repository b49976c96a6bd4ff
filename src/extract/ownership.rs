//! Owner-direct vs agency classification.
//!
//! Pure keyword heuristics over lowercased page text. The keyword sets are
//! configuration, not code: callers inject [`KeywordSets`] so the lists can
//! be tuned without touching the classifier.

/// Keyword configuration for both classification levels.
#[derive(Debug, Clone)]
pub struct KeywordSets {
    /// Detail-level owner signals.
    pub owner: Vec<String>,
    /// Detail-level agency signals. Any hit vetoes an owner verdict.
    pub agency: Vec<String>,
    /// Cheap summary-level owner signals.
    pub summary_owner: Vec<String>,
    /// Summary-level agency signals.
    pub summary_agency: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            owner: owned(&[
                "dueño directo",
                "propietario",
                "vende dueño",
                "particular",
                "dueña",
            ]),
            agency: owned(&[
                "inmobiliaria",
                "real estate",
                "brokers",
                "agente",
                "martillero",
            ]),
            summary_owner: owned(&["dueño", "propietario"]),
            summary_agency: owned(&["inmobiliaria"]),
        }
    }
}

/// Which heuristic to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyLevel {
    /// Weak OR-based pre-filter over a search-results card. May
    /// over-classify as owner; detail-level must re-validate.
    Summary,
    /// Authoritative conjunctive rule over a full detail page.
    Detail,
}

/// Classify page text as owner-direct. Case-insensitive substring matching.
pub fn classify(text: &str, keywords: &KeywordSets, level: ClassifyLevel) -> bool {
    let text = text.to_lowercase();
    match level {
        ClassifyLevel::Summary => {
            contains_any(&text, &keywords.summary_owner)
                || !contains_any(&text, &keywords.summary_agency)
        }
        ClassifyLevel::Detail => {
            // Agency keywords veto even when owner keywords are present.
            contains_any(&text, &keywords.owner) && !contains_any(&text, &keywords.agency)
        }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}
