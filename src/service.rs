//! Job submission entry point
//!
//! [`Scraper`] owns the queue and the configuration. Each call validates its
//! input, submits one job, and awaits it. A job opens its own
//! [`BrowserSession`], navigates, extracts, and always closes the session
//! before returning, whatever happened in between.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::product::{ProductPipeline, ProductRecord};
use crate::queue::ScrapeQueue;
use crate::session::BrowserSession;
use crate::shopping_search::{
    RESULTS_WAIT_TIMEOUT_SECS, SearchResultItem, SearchResultPipeline, build_search_url,
    validate_query,
};
use crate::utils::is_valid_url;

/// Stable message for failed product jobs
pub const PRODUCT_FAILURE_MESSAGE: &str = "Erro no scraping";

/// Stable message for failed search jobs
pub const SEARCH_FAILURE_MESSAGE: &str = "Falha na pesquisa";

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    pub details: String,
}

impl FailureEnvelope {
    #[must_use]
    pub fn new(error: &str, cause: &ScrapeError) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: cause.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductResponse {
    Success(ProductRecord),
    Failure(FailureEnvelope),
}

impl ProductResponse {
    #[must_use]
    pub fn from_result(result: ScrapeResult<ProductRecord>) -> Self {
        match result {
            Ok(record) => Self::Success(record),
            Err(e) => Self::Failure(FailureEnvelope::new(PRODUCT_FAILURE_MESSAGE, &e)),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuccess {
    pub success: bool,
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Success(SearchSuccess),
    Failure(FailureEnvelope),
}

impl SearchResponse {
    #[must_use]
    pub fn from_result(result: ScrapeResult<Vec<SearchResultItem>>) -> Self {
        match result {
            Ok(results) => Self::Success(SearchSuccess {
                success: true,
                results,
            }),
            Err(e) => Self::Failure(FailureEnvelope::new(SEARCH_FAILURE_MESSAGE, &e)),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

// =============================================================================
// Scraper
// =============================================================================

/// Product and search scraper with a shared concurrency ceiling
#[derive(Debug, Clone)]
pub struct Scraper {
    config: Arc<ScrapeConfig>,
    queue: ScrapeQueue,
}

impl Scraper {
    #[must_use]
    pub fn new(config: ScrapeConfig) -> Self {
        let queue = ScrapeQueue::with_max_queued(config.concurrency(), config.max_queued());
        Self {
            config: Arc::new(config),
            queue,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    #[must_use]
    pub fn queue(&self) -> &ScrapeQueue {
        &self.queue
    }

    /// Scrape one product page and wrap the outcome in a response envelope
    pub async fn scrape_product(&self, url: &str) -> ProductResponse {
        ProductResponse::from_result(self.product_record(url).await)
    }

    /// Run a search and wrap the outcome in a response envelope
    pub async fn search(&self, query: &str) -> SearchResponse {
        SearchResponse::from_result(self.search_results(query).await)
    }

    /// Scrape one product page.
    ///
    /// # Errors
    /// `InvalidUrl` or `QueueFull` before the job is admitted; any browser or
    /// navigation failure once it runs.
    pub async fn product_record(&self, url: &str) -> ScrapeResult<ProductRecord> {
        let url = url.trim().to_string();
        if !is_valid_url(&url) {
            warn!("Rejecting product job for invalid URL {url:?}");
            return Err(ScrapeError::InvalidUrl(url));
        }

        let config = Arc::clone(&self.config);
        let handle = self
            .queue
            .submit(move || async move { run_product_job(&config, &url).await })?;
        handle.await?
    }

    /// Run a shopping search for `query`.
    ///
    /// # Errors
    /// `InvalidQuery` or `QueueFull` before the job is admitted; any browser
    /// or navigation failure once it runs.
    pub async fn search_results(&self, query: &str) -> ScrapeResult<Vec<SearchResultItem>> {
        let query = validate_query(query)?;

        let config = Arc::clone(&self.config);
        let handle = self
            .queue
            .submit(move || async move { run_search_job(&config, &query).await })?;
        handle.await?
    }
}

async fn run_product_job(config: &ScrapeConfig, url: &str) -> ScrapeResult<ProductRecord> {
    info!("Starting product job for {url}");
    let mut session = BrowserSession::open(config).await?;

    let outcome = async {
        session
            .navigate(url, config.product_navigation_timeout())
            .await?;
        session.trigger_lazy_load().await;
        Ok::<_, ScrapeError>(ProductPipeline::new(config).extract(&session, url).await)
    }
    .await;

    session.close().await;
    if let Err(e) = &outcome {
        warn!("Product job for {url} failed: {e}");
    }
    outcome
}

async fn run_search_job(config: &ScrapeConfig, query: &str) -> ScrapeResult<Vec<SearchResultItem>> {
    let url = build_search_url(config.search_origin(), config.search_language(), query);
    info!("Starting search job for {query:?}");
    let mut session = BrowserSession::open(config).await?;

    let outcome = async {
        session
            .navigate(&url, config.search_navigation_timeout())
            .await?;

        let pipeline = SearchResultPipeline::new(config.search_origin());
        // Zero results is a valid outcome, so a missing container is not an error
        session
            .wait_for_selector(
                &pipeline.selectors().container,
                Duration::from_secs(RESULTS_WAIT_TIMEOUT_SECS),
            )
            .await;
        Ok::<_, ScrapeError>(pipeline.extract(&session).await)
    }
    .await;

    session.close().await;
    if let Err(e) = &outcome {
        warn!("Search job for {query:?} failed: {e}");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_rejected_without_browser() {
        let scraper = Scraper::new(ScrapeConfig::default());
        let response = scraper.scrape_product("ftp://loja/p").await;
        match response {
            ProductResponse::Failure(envelope) => {
                assert!(!envelope.success);
                assert_eq!(envelope.error, PRODUCT_FAILURE_MESSAGE);
                assert!(envelope.details.contains("ftp://loja/p"));
            }
            ProductResponse::Success(_) => panic!("expected failure"),
        }
        assert_eq!(scraper.queue().active(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_without_browser() {
        let scraper = Scraper::new(ScrapeConfig::default());
        let response = scraper.search("   ").await;
        assert!(!response.is_success());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], SEARCH_FAILURE_MESSAGE);
        assert_eq!(json["success"], false);
    }
}
