pub mod browser_setup;
pub mod config;
pub mod error;
pub mod page_query;
pub mod product;
pub mod queue;
pub mod service;
pub mod session;
pub mod shopping_search;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use error::{ScrapeError, ScrapeResult};
pub use page_query::{ImageCandidate, PageQuery, Probe, Source, StaticPage};
pub use product::{NormalizedPrice, ProductPipeline, ProductRecord, RawCandidate, Strategy};
pub use queue::{JobHandle, ScrapeQueue};
pub use service::{
    FailureEnvelope, ProductResponse, Scraper, SearchResponse, SearchSuccess,
    PRODUCT_FAILURE_MESSAGE, SEARCH_FAILURE_MESSAGE,
};
pub use session::BrowserSession;
pub use shopping_search::{SearchResultItem, SearchResultPipeline, SearchSelectors};

/// Scrape one product page with a throwaway [`Scraper`]
///
/// Convenience for one-off calls; long-running callers should keep a
/// `Scraper` so every job shares one concurrency ceiling.
pub async fn scrape_product(config: ScrapeConfig, url: &str) -> ProductResponse {
    Scraper::new(config).scrape_product(url).await
}
