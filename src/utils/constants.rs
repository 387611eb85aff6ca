//! Shared configuration constants for shopscrape
//!
//! Default values used by `ScrapeConfig` and the extraction pipelines,
//! kept in one place to avoid magic numbers.

/// Default number of scrape jobs allowed to run at once
///
/// Each running job owns one Chromium process, so this is also the
/// ceiling on live browser processes.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Navigation timeout for product pages (seconds)
pub const DEFAULT_PRODUCT_NAV_TIMEOUT_SECS: u64 = 30;

/// Navigation timeout for shopping search pages (seconds)
pub const DEFAULT_SEARCH_NAV_TIMEOUT_SECS: u64 = 20;

/// Pixels scrolled per lazy-load step
pub const DEFAULT_SCROLL_STEP_PX: u32 = 350;

/// Delay between lazy-load scroll steps (milliseconds)
pub const DEFAULT_SCROLL_INTERVAL_MS: u64 = 200;

/// Upper bound on scroll steps
///
/// Infinite-scroll pages keep growing `scrollHeight`; without a cap the
/// lazy-load trigger would never resolve on them.
pub const DEFAULT_MAX_SCROLL_STEPS: u32 = 120;

/// Number of `<img>` elements inspected by the image fallback
pub const DEFAULT_IMAGE_CANDIDATE_LIMIT: usize = 30;

/// Minimum width and height (px) for an image to count as a product photo
///
/// Filters out logos, icons and tracking pixels.
pub const DEFAULT_MIN_IMAGE_DIMENSION: u32 = 200;

/// Title used when no strategy finds one
pub const DEFAULT_TITLE_PLACEHOLDER: &str = "Título não encontrado";

/// Search engine origin used for shopping searches and for absolutizing result links
pub const DEFAULT_SEARCH_ORIGIN: &str = "https://www.google.com";

/// Interface language requested from the search engine
pub const DEFAULT_SEARCH_LANGUAGE: &str = "pt-BR";

/// Maximum accepted search query length (characters)
pub const MAX_QUERY_LENGTH: usize = 512;

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
