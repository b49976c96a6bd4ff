//! HTTP-backed page sessions.
//!
//! The target site serves listing markup server-side, so a plain fetch plus
//! HTML parse stands in for a rendering engine. `wait_for_selector` resolves
//! against the already-loaded static document: the selector either matches
//! now or never will.

use crate::fetcher::{FetchedPage, fetch_page};
use crate::render::{PageRenderer, PageSession, RenderError};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

pub struct HttpRenderer;

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn open(&self) -> Result<Box<dyn PageSession>, RenderError> {
        Ok(Box::new(HttpSession {
            current: None,
            closed: false,
        }))
    }

    fn engine(&self) -> &'static str {
        "http-fetch"
    }
}

struct HttpSession {
    current: Option<FetchedPage>,
    closed: bool,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::SessionClosed);
        }
        let page = fetch_page(url, timeout).await?;
        debug!(url = %page.url_final, status = %page.status, "page loaded");
        self.current = Some(page);
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::SessionClosed);
        }
        let page = self.current.as_ref().ok_or(RenderError::NoPage)?;

        let parsed = Selector::parse(selector)
            .map_err(|_| RenderError::InvalidSelector(selector.to_string()))?;
        let document = Html::parse_document(&page.body);
        if document.select(&parsed).next().is_some() {
            Ok(())
        } else {
            Err(RenderError::SelectorTimeout {
                selector: selector.to_string(),
            })
        }
    }

    fn content(&self) -> Result<String, RenderError> {
        if self.closed {
            return Err(RenderError::SessionClosed);
        }
        self.current
            .as_ref()
            .map(|p| p.body.clone())
            .ok_or(RenderError::NoPage)
    }

    async fn close(&mut self) {
        self.current = None;
        self.closed = true;
    }
}
