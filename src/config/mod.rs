//! Configuration handling for the application.
//!
//! All knobs come from environment variables with sensible development
//! defaults, so the service runs locally with no setup. The settling delays
//! are part of the politeness contract against the upstream site and must
//! stay configurable rather than hard-coded in the pipeline.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names. Keeping them public lets tests and deploy
/// scripts refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_SEARCH_BASE_URL: &str = "SEARCH_BASE_URL";
pub const ENV_PAGE_LOAD_TIMEOUT_MS: &str = "PAGE_LOAD_TIMEOUT_MS";
pub const ENV_SELECTOR_TIMEOUT_MS: &str = "SELECTOR_TIMEOUT_MS";
pub const ENV_SETTLE_DELAY_MS: &str = "SETTLE_DELAY_MS";
pub const ENV_LISTING_DELAY_MS: &str = "LISTING_DELAY_MS";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SEARCH_BASE_URL: &str = "https://www.argenprop.com";
const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SELECTOR_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;
const DEFAULT_LISTING_DELAY_MS: u64 = 1_000;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    search_base_url: String,
    page_load_timeout_ms: u64,
    selector_timeout_ms: u64,
    settle_delay_ms: u64,
    listing_delay_ms: u64,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let search_base_url =
            env::var(ENV_SEARCH_BASE_URL).unwrap_or_else(|_| DEFAULT_SEARCH_BASE_URL.to_string());
        let page_load_timeout_ms =
            parse_ms(ENV_PAGE_LOAD_TIMEOUT_MS, DEFAULT_PAGE_LOAD_TIMEOUT_MS)?;
        let selector_timeout_ms = parse_ms(ENV_SELECTOR_TIMEOUT_MS, DEFAULT_SELECTOR_TIMEOUT_MS)?;
        let settle_delay_ms = parse_ms(ENV_SETTLE_DELAY_MS, DEFAULT_SETTLE_DELAY_MS)?;
        let listing_delay_ms = parse_ms(ENV_LISTING_DELAY_MS, DEFAULT_LISTING_DELAY_MS)?;

        if search_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: ENV_SEARCH_BASE_URL,
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            search_base_url,
            page_load_timeout_ms,
            selector_timeout_ms,
            settle_delay_ms,
            listing_delay_ms,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Base URL of the classifieds site search pages.
    pub fn search_base_url(&self) -> &str {
        &self.search_base_url
    }
    /// Timeout for a single page navigation.
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }
    /// Timeout for waiting on a selector after navigation.
    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }
    /// Settling delay inserted after each detail-page load.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
    /// Delay inserted after each processed listing.
    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    /// Override the search base URL (tests point this at a mock server).
    pub fn with_search_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.search_base_url = base_url.into();
        self
    }

    /// Zero out the politeness delays. Tests only; production runs keep them.
    pub fn without_delays(mut self) -> Self {
        self.settle_delay_ms = 0;
        self.listing_delay_ms = 0;
        self
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
            selector_timeout_ms: DEFAULT_SELECTOR_TIMEOUT_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            listing_delay_ms: DEFAULT_LISTING_DELAY_MS,
        }
    }
}

fn parse_ms(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: key,
            reason: format!("'{raw}' is not a millisecond count"),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_BIND_ADDR,
            ENV_SEARCH_BASE_URL,
            ENV_PAGE_LOAD_TIMEOUT_MS,
            ENV_SELECTOR_TIMEOUT_MS,
            ENV_SETTLE_DELAY_MS,
            ENV_LISTING_DELAY_MS,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.search_base_url(), DEFAULT_SEARCH_BASE_URL);
        assert_eq!(cfg.settle_delay(), Duration::from_millis(2_000));
        assert_eq!(cfg.listing_delay(), Duration::from_millis(1_000));
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_BIND_ADDR, "0.0.0.0:9000");
            env::set_var(ENV_SEARCH_BASE_URL, "http://localhost:8123");
            env::set_var(ENV_LISTING_DELAY_MS, "250");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.search_base_url(), "http://localhost:8123");
        assert_eq!(cfg.listing_delay(), Duration::from_millis(250));
        clear_env();
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_SETTLE_DELAY_MS, "soon");
        }
        let err = Config::from_env().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { field, .. } if field == ENV_SETTLE_DELAY_MS)
        );
        clear_env();
    }
}
