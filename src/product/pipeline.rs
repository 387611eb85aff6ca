//! Product extraction pipeline
//!
//! Runs the strategies in priority order, folds their partial results with
//! first-wins semantics, then normalizes price and image into a
//! [`ProductRecord`].

use tracing::{debug, info};

use super::price;
use super::strategies::{Strategy, StrategyContext};
use super::types::{ProductRecord, RawCandidate};
use crate::config::ScrapeConfig;
use crate::page_query::PageQuery;
use crate::utils::resolve_url;

/// Stateless orchestrator; cheap to construct per job
#[derive(Debug, Clone)]
pub struct ProductPipeline {
    ctx: StrategyContext,
    title_placeholder: String,
}

impl ProductPipeline {
    #[must_use]
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            ctx: StrategyContext {
                image_candidate_limit: config.image_candidate_limit(),
                min_image_dimension: config.min_image_dimension(),
            },
            title_placeholder: config.title_placeholder().to_string(),
        }
    }

    /// Run every strategy that can still contribute and merge the results
    pub async fn collect<P: PageQuery>(&self, page: &P) -> RawCandidate {
        let mut acc = RawCandidate::default();
        for strategy in Strategy::ORDER {
            if !strategy.is_needed(&acc) {
                continue;
            }
            let found = strategy.run(page, self.ctx).await;
            acc = acc.merge(found);
        }
        acc
    }

    /// Extract a normalized record for `url` from the loaded `page`.
    ///
    /// Never fails: every field except `title` may be `None`.
    pub async fn extract<P: PageQuery>(&self, page: &P, url: &str) -> ProductRecord {
        let candidate = self.collect(page).await;
        let base = page.current_url().await.unwrap_or_else(|| url.to_string());
        let record = self.finalize(url, &base, candidate);
        info!(
            "Extracted product from {url}: title={:?} price={:?} image={}",
            record.title,
            record.price,
            record.image.is_some()
        );
        record
    }

    /// Turn a merged candidate into the output record
    #[must_use]
    pub fn finalize(&self, url: &str, base: &str, candidate: RawCandidate) -> ProductRecord {
        let raw_price = candidate.price.filter(|p| !p.trim().is_empty());

        let (price, price_value, price_currency) = match raw_price {
            Some(raw) => {
                let normalized = price::normalize(&raw, candidate.price_currency.as_deref());
                let display = normalized.display().unwrap_or_else(|| raw.trim().to_string());
                (Some(display), normalized.value, normalized.currency)
            }
            None => (None, None, candidate.price_currency),
        };

        let image = candidate.image.as_deref().and_then(|src| {
            let resolved = resolve_url(Some(base), src);
            if resolved.is_none() {
                debug!("Discarding unusable image source {src:?}");
            }
            resolved
        });

        let title = candidate
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.title_placeholder.clone());

        ProductRecord {
            success: true,
            url: url.to_string(),
            title,
            price,
            price_value,
            price_currency,
            image,
        }
    }
}
