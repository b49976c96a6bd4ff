//! Page-rendering collaborator interface.
//!
//! The extraction pipeline never talks to a concrete engine; it drives a
//! [`PageSession`] obtained from a [`PageRenderer`]. One session is opened
//! per pipeline run, used exclusively by that run, and closed on every exit
//! path. The default implementation fetches server-rendered HTML over HTTP
//! ([`http::HttpRenderer`]); a headless-browser implementation can slot in
//! behind the same traits.

pub mod http;

use crate::fetcher::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("navigation failed: {0}")]
    Navigation(#[from] FetchError),

    #[error("timed out waiting for selector '{selector}'")]
    SelectorTimeout { selector: String },

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("no page loaded")]
    NoPage,

    #[error("session closed")]
    SessionClosed,
}

impl RenderError {
    /// Recoverable render errors trigger a fallback URL or a per-listing
    /// skip; unrecoverable ones abort the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Navigation(fetch) => fetch.is_recoverable(),
            Self::SelectorTimeout { .. } => true,
            Self::InvalidSelector(_) => false,
            Self::NoPage => false,
            Self::SessionClosed => false,
        }
    }
}

/// One exclusive page-viewing session, equivalent to a browser tab.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSession: Send {
    /// Load `url`, replacing the current document. Bounded by `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Wait until `selector` matches in the current document.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// Full markup of the current document.
    fn content(&self) -> Result<String, RenderError>;

    /// Release the session. Idempotent.
    async fn close(&mut self);
}

/// Factory for per-run sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageSession>, RenderError>;

    /// Human-readable engine identity, reported by the health endpoint.
    fn engine(&self) -> &'static str;
}
