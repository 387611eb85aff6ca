//! Environment overlay for `ScrapeConfig`
//!
//! Recognised variables:
//! - `SHOPSCRAPE_CONCURRENCY` - concurrent job ceiling
//! - `SHOPSCRAPE_MAX_QUEUED` - waiting-job bound (`0` or empty = unbounded)
//! - `SHOPSCRAPE_NAV_TIMEOUT_SECS` - product navigation timeout
//! - `SHOPSCRAPE_SEARCH_TIMEOUT_SECS` - search navigation timeout
//! - `SHOPSCRAPE_HEADLESS` - `true`/`false`
//! - `CHROMIUM_PATH` - browser executable
//!
//! Malformed values are ignored with a warning and the builder value is kept.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use super::builder::ScrapeConfigBuilder;
use super::types::ScrapeConfig;

pub const ENV_CONCURRENCY: &str = "SHOPSCRAPE_CONCURRENCY";
pub const ENV_MAX_QUEUED: &str = "SHOPSCRAPE_MAX_QUEUED";
pub const ENV_NAV_TIMEOUT: &str = "SHOPSCRAPE_NAV_TIMEOUT_SECS";
pub const ENV_SEARCH_TIMEOUT: &str = "SHOPSCRAPE_SEARCH_TIMEOUT_SECS";
pub const ENV_HEADLESS: &str = "SHOPSCRAPE_HEADLESS";
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring malformed {name}={trimmed:?}");
            None
        }
    }
}

impl ScrapeConfigBuilder {
    /// Overlay values from a variable lookup function
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    #[must_use]
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(concurrency) = parse_var::<usize>(ENV_CONCURRENCY, lookup(ENV_CONCURRENCY)) {
            self = self.concurrency(concurrency);
        }
        if let Some(max_queued) = parse_var::<usize>(ENV_MAX_QUEUED, lookup(ENV_MAX_QUEUED)) {
            self = self.max_queued((max_queued > 0).then_some(max_queued));
        }
        if let Some(secs) = parse_var::<u64>(ENV_NAV_TIMEOUT, lookup(ENV_NAV_TIMEOUT)) {
            self = self.product_navigation_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var::<u64>(ENV_SEARCH_TIMEOUT, lookup(ENV_SEARCH_TIMEOUT)) {
            self = self.search_navigation_timeout(Duration::from_secs(secs));
        }
        if let Some(headless) = parse_var::<bool>(ENV_HEADLESS, lookup(ENV_HEADLESS)) {
            self = self.headless(headless);
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|p| !p.trim().is_empty()) {
            self = self.chrome_executable(path.trim());
        }
        self
    }

    /// Overlay values from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_lookup(|name| std::env::var(name).ok())
    }
}

impl ScrapeConfig {
    /// Defaults overlaid with the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder().with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = ScrapeConfig::builder()
            .with_env_lookup(lookup(&[
                (ENV_CONCURRENCY, "4"),
                (ENV_MAX_QUEUED, "100"),
                (ENV_NAV_TIMEOUT, "45"),
                (ENV_SEARCH_TIMEOUT, "10"),
                (ENV_HEADLESS, "false"),
                (ENV_CHROMIUM_PATH, "/opt/chromium/chrome"),
            ]))
            .build();

        assert_eq!(config.concurrency(), 4);
        assert_eq!(config.max_queued(), Some(100));
        assert_eq!(config.product_navigation_timeout(), Duration::from_secs(45));
        assert_eq!(config.search_navigation_timeout(), Duration::from_secs(10));
        assert!(!config.headless());
        assert_eq!(
            config.chrome_executable().map(|p| p.to_string_lossy().into_owned()),
            Some("/opt/chromium/chrome".to_string())
        );
    }

    #[test]
    fn test_malformed_env_values_are_ignored() {
        let config = ScrapeConfig::builder()
            .with_env_lookup(lookup(&[
                (ENV_CONCURRENCY, "many"),
                (ENV_HEADLESS, "sometimes"),
            ]))
            .build();

        assert_eq!(config.concurrency(), 2);
        assert!(config.headless());
    }

    #[test]
    fn test_zero_max_queued_means_unbounded() {
        let config = ScrapeConfig::builder()
            .max_queued(Some(5))
            .with_env_lookup(lookup(&[(ENV_MAX_QUEUED, "0")]))
            .build();
        assert_eq!(config.max_queued(), None);
    }
}
