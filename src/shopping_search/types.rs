//! Data structures and selectors for shopping search results

use serde::{Deserialize, Serialize};

// =============================================================================
// Selectors
// =============================================================================

/// CSS selector for one result card on the shopping results page
pub const RESULT_CONTAINER_SELECTOR: &str = "div.sh-dgr__content";

/// Result title selectors, tried in order
pub const NAME_SELECTORS: [&str; 2] = ["h3", ".tAxDx"];

/// Visible price text inside a result card
pub const PRICE_SELECTOR: &str = ".a8Pemb";

/// Thumbnail inside a result card
pub const IMAGE_SELECTOR: &str = "img";

/// Result link inside a result card
pub const LINK_SELECTOR: &str = "a";

/// How long to poll for the first result card after navigation (seconds)
pub const RESULTS_WAIT_TIMEOUT_SECS: u64 = 5;

/// Selector set used by [`super::SearchResultPipeline`]
///
/// Defaults target the Google Shopping results layout; override when the
/// markup changes or when extracting a different engine's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSelectors {
    pub container: String,
    pub names: Vec<String>,
    pub price: String,
    pub image: String,
    pub link: String,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            container: RESULT_CONTAINER_SELECTOR.to_string(),
            names: NAME_SELECTORS.iter().map(|s| (*s).to_string()).collect(),
            price: PRICE_SELECTOR.to_string(),
            image: IMAGE_SELECTOR.to_string(),
            link: LINK_SELECTOR.to_string(),
        }
    }
}

// =============================================================================
// Data Structures
// =============================================================================

/// One shopping result, in engine ranking order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Product name (never empty; nameless cards are dropped)
    pub name: String,

    /// Raw price text as displayed
    pub price: Option<String>,

    /// Thumbnail source attribute
    pub image_url: Option<String>,

    /// Absolute result URL
    pub link: Option<String>,
}
