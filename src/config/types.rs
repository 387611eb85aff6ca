//! Core configuration type for scrape jobs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::builder::ScrapeConfigBuilder;

/// Configuration shared by every job a `Scraper` runs
///
/// Built once at construction time and handed to the queue and sessions;
/// nothing in here changes while jobs are running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Maximum number of jobs (and therefore Chromium processes) alive at once.
    ///
    /// **INVARIANT:** At least 1 (clamped in builder).
    pub(crate) concurrency: usize,

    /// Maximum number of jobs waiting for a slot.
    ///
    /// `None` keeps waiting jobs unbounded. When set, submissions beyond
    /// the bound fail with `ScrapeError::QueueFull`.
    pub(crate) max_queued: Option<usize>,

    /// Timeout in seconds for product page navigation
    ///
    /// Default: 30 seconds
    pub(crate) product_navigation_timeout_secs: u64,

    /// Timeout in seconds for search page navigation
    ///
    /// Default: 20 seconds
    pub(crate) search_navigation_timeout_secs: u64,

    pub(crate) scroll_step_px: u32,
    pub(crate) scroll_interval_ms: u64,
    pub(crate) max_scroll_steps: u32,

    pub(crate) image_candidate_limit: usize,
    pub(crate) min_image_dimension: u32,

    pub(crate) headless: bool,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) user_agent: String,

    /// Search engine origin, e.g. `https://www.google.com`.
    ///
    /// **INVARIANT:** No trailing slash (trimmed in builder).
    pub(crate) search_origin: String,
    pub(crate) search_language: String,

    pub(crate) title_placeholder: String,
}

impl ScrapeConfig {
    /// Start building a configuration from defaults
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfigBuilder::default().build()
    }
}
