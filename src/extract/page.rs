//! Narrow document-access capability used by every extraction component.
//!
//! Extraction logic depends only on this wrapper, never on a rendering
//! engine, so unit tests run against fixture markup.

use scraper::{ElementRef, Html, Selector};

pub struct PageContent {
    document: Html,
    raw: String,
}

impl PageContent {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
            raw: markup.to_string(),
        }
    }

    /// The full original markup, scripts and attributes included.
    pub fn full_markup(&self) -> &str {
        &self.raw
    }

    /// All elements matching `selector`, in document order. An invalid
    /// selector matches nothing.
    pub fn fragments(&self, selector: &str) -> Vec<PageFragment<'_>> {
        let Ok(parsed) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.document
            .select(&parsed)
            .map(|node| PageFragment { node })
            .collect()
    }

    /// Trimmed text of the first non-empty match for `selector`.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let parsed = Selector::parse(selector).ok()?;
        self.document.select(&parsed).find_map(|node| {
            let text = collect_text(node);
            (!text.is_empty()).then_some(text)
        })
    }
}

/// One matched element, offering the same scoped capabilities.
pub struct PageFragment<'a> {
    node: ElementRef<'a>,
}

impl PageFragment<'_> {
    /// Trimmed text of the whole subtree.
    pub fn text(&self) -> String {
        collect_text(self.node)
    }

    /// An attribute on the matched element itself.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.node.value().attr(name)
    }

    /// Trimmed text of the first non-empty descendant match.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let parsed = Selector::parse(selector).ok()?;
        self.node.select(&parsed).find_map(|node| {
            let text = collect_text(node);
            (!text.is_empty()).then_some(text)
        })
    }

    /// An attribute of the first descendant match carrying it.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let parsed = Selector::parse(selector).ok()?;
        self.node
            .select(&parsed)
            .find_map(|node| node.value().attr(attr).map(str::to_string))
    }
}

fn collect_text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}
