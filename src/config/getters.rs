//! Getter methods for `ScrapeConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::ScrapeConfig;

impl ScrapeConfig {
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn max_queued(&self) -> Option<usize> {
        self.max_queued
    }

    #[must_use]
    pub fn product_navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.product_navigation_timeout_secs)
    }

    #[must_use]
    pub fn search_navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.search_navigation_timeout_secs)
    }

    #[must_use]
    pub fn scroll_step_px(&self) -> u32 {
        self.scroll_step_px
    }

    #[must_use]
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    #[must_use]
    pub fn max_scroll_steps(&self) -> u32 {
        self.max_scroll_steps
    }

    #[must_use]
    pub fn image_candidate_limit(&self) -> usize {
        self.image_candidate_limit
    }

    #[must_use]
    pub fn min_image_dimension(&self) -> u32 {
        self.min_image_dimension
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&PathBuf> {
        self.chrome_executable.as_ref()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn search_origin(&self) -> &str {
        &self.search_origin
    }

    #[must_use]
    pub fn search_language(&self) -> &str {
        &self.search_language
    }

    #[must_use]
    pub fn title_placeholder(&self) -> &str {
        &self.title_placeholder
    }
}
