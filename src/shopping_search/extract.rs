//! Result-card extraction
//!
//! Reads every result card in one pass and materializes the full list
//! before returning. Order follows the DOM, which follows the engine's
//! ranking.

use tracing::{debug, info};

use super::types::{SearchResultItem, SearchSelectors};
use crate::page_query::{PageQuery, Probe};
use crate::utils::resolve_url;

#[derive(Debug, Clone)]
pub struct SearchResultPipeline {
    selectors: SearchSelectors,
    origin: String,
}

impl SearchResultPipeline {
    /// `origin` is prefixed to relative result links
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_selectors(origin, SearchSelectors::default())
    }

    #[must_use]
    pub fn with_selectors(origin: impl Into<String>, selectors: SearchSelectors) -> Self {
        Self {
            selectors,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn selectors(&self) -> &SearchSelectors {
        &self.selectors
    }

    pub async fn extract<P: PageQuery>(&self, page: &P) -> Vec<SearchResultItem> {
        let selectors = &self.selectors;
        let name_count = selectors.names.len();

        // Layout: [names..., price, image, link]
        let mut probes: Vec<Probe<'_>> =
            selectors.names.iter().map(|s| Probe::text(s)).collect();
        probes.push(Probe::text(&selectors.price));
        probes.push(Probe::attr(&selectors.image, "src"));
        probes.push(Probe::attr(&selectors.link, "href"));

        let rows = page.probe_scoped(&selectors.container, &probes).await;
        let total = rows.len();

        let items: Vec<SearchResultItem> = rows
            .into_iter()
            .filter_map(|row| self.item_from_row(row, name_count))
            .collect();

        info!(
            "Extracted {} search results ({} cards without a name dropped)",
            items.len(),
            total - items.len()
        );
        items
    }

    fn item_from_row(&self, row: Vec<Option<String>>, name_count: usize) -> Option<SearchResultItem> {
        let mut values = row.into_iter();
        let mut name = None;
        for candidate in values.by_ref().take(name_count) {
            if name.is_none() {
                name = candidate;
            }
        }
        let price = values.next().flatten();
        let image_url = values.next().flatten();
        let link = values.next().flatten();

        let Some(name) = name else {
            debug!("Dropping result card without a name");
            return None;
        };

        Some(SearchResultItem {
            name,
            price,
            image_url,
            link: link.map(|href| self.absolutize(href)),
        })
    }

    /// Relative links get the engine origin; absolute links pass through
    fn absolutize(&self, href: String) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href;
        }
        if href.starts_with('/') {
            return format!("{}{href}", self.origin);
        }
        resolve_url(Some(&format!("{}/", self.origin)), &href).unwrap_or(href)
    }
}
