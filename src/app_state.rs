use crate::config::Config;
use crate::extract::KeywordSets;
use crate::render::{PageRenderer, http::HttpRenderer};
use std::sync::Arc;

/// Shared service state, built once at startup and injected everywhere.
/// There is no ambient global; tests construct their own with fake
/// renderers or tuned keyword sets.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub renderer: Arc<dyn PageRenderer>,
    pub keywords: Arc<KeywordSets>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            renderer: Arc::new(HttpRenderer),
            keywords: Arc::new(KeywordSets::default()),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}
