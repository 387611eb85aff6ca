//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so `build()` is always available. Values that
//! would break an invariant are clamped rather than rejected.

use std::path::PathBuf;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_CONCURRENCY, DEFAULT_IMAGE_CANDIDATE_LIMIT,
    DEFAULT_MAX_SCROLL_STEPS, DEFAULT_MIN_IMAGE_DIMENSION, DEFAULT_PRODUCT_NAV_TIMEOUT_SECS,
    DEFAULT_SCROLL_INTERVAL_MS, DEFAULT_SCROLL_STEP_PX, DEFAULT_SEARCH_LANGUAGE,
    DEFAULT_SEARCH_NAV_TIMEOUT_SECS, DEFAULT_SEARCH_ORIGIN, DEFAULT_TITLE_PLACEHOLDER,
};

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    pub(crate) concurrency: usize,
    pub(crate) max_queued: Option<usize>,
    pub(crate) product_navigation_timeout_secs: u64,
    pub(crate) search_navigation_timeout_secs: u64,
    pub(crate) scroll_step_px: u32,
    pub(crate) scroll_interval_ms: u64,
    pub(crate) max_scroll_steps: u32,
    pub(crate) image_candidate_limit: usize,
    pub(crate) min_image_dimension: u32,
    pub(crate) headless: bool,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) user_agent: String,
    pub(crate) search_origin: String,
    pub(crate) search_language: String,
    pub(crate) title_placeholder: String,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_queued: None,
            product_navigation_timeout_secs: DEFAULT_PRODUCT_NAV_TIMEOUT_SECS,
            search_navigation_timeout_secs: DEFAULT_SEARCH_NAV_TIMEOUT_SECS,
            scroll_step_px: DEFAULT_SCROLL_STEP_PX,
            scroll_interval_ms: DEFAULT_SCROLL_INTERVAL_MS,
            max_scroll_steps: DEFAULT_MAX_SCROLL_STEPS,
            image_candidate_limit: DEFAULT_IMAGE_CANDIDATE_LIMIT,
            min_image_dimension: DEFAULT_MIN_IMAGE_DIMENSION,
            headless: true,
            chrome_executable: None,
            user_agent: CHROME_USER_AGENT.to_string(),
            search_origin: DEFAULT_SEARCH_ORIGIN.to_string(),
            search_language: DEFAULT_SEARCH_LANGUAGE.to_string(),
            title_placeholder: DEFAULT_TITLE_PLACEHOLDER.to_string(),
        }
    }
}

impl ScrapeConfigBuilder {
    /// Maximum concurrent jobs; values below 1 are raised to 1
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Bound the number of waiting jobs (`None` = unbounded)
    #[must_use]
    pub fn max_queued(mut self, max_queued: Option<usize>) -> Self {
        self.max_queued = max_queued;
        self
    }

    #[must_use]
    pub fn product_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.product_navigation_timeout_secs = timeout.as_secs().max(1);
        self
    }

    #[must_use]
    pub fn search_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.search_navigation_timeout_secs = timeout.as_secs().max(1);
        self
    }

    #[must_use]
    pub fn scroll_step_px(mut self, px: u32) -> Self {
        self.scroll_step_px = px.max(1);
        self
    }

    #[must_use]
    pub fn scroll_interval(mut self, interval: Duration) -> Self {
        self.scroll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn max_scroll_steps(mut self, steps: u32) -> Self {
        self.max_scroll_steps = steps;
        self
    }

    #[must_use]
    pub fn image_candidate_limit(mut self, limit: usize) -> Self {
        self.image_candidate_limit = limit;
        self
    }

    #[must_use]
    pub fn min_image_dimension(mut self, px: u32) -> Self {
        self.min_image_dimension = px;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn search_origin(mut self, origin: impl Into<String>) -> Self {
        self.search_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn search_language(mut self, language: impl Into<String>) -> Self {
        self.search_language = language.into();
        self
    }

    #[must_use]
    pub fn title_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.title_placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn build(self) -> ScrapeConfig {
        ScrapeConfig {
            concurrency: self.concurrency.max(1),
            max_queued: self.max_queued,
            product_navigation_timeout_secs: self.product_navigation_timeout_secs,
            search_navigation_timeout_secs: self.search_navigation_timeout_secs,
            scroll_step_px: self.scroll_step_px,
            scroll_interval_ms: self.scroll_interval_ms,
            max_scroll_steps: self.max_scroll_steps,
            image_candidate_limit: self.image_candidate_limit,
            min_image_dimension: self.min_image_dimension,
            headless: self.headless,
            chrome_executable: self.chrome_executable,
            user_agent: self.user_agent,
            search_origin: self.search_origin.trim_end_matches('/').to_string(),
            search_language: self.search_language,
            title_placeholder: self.title_placeholder,
        }
    }
}
