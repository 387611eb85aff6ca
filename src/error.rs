//! Error types for scrape jobs
//!
//! Only failures that make a whole job unusable live here. Missing fields,
//! malformed structured data and absent selectors never become errors; the
//! page-query layer reports them as empty values.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for scrape jobs
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Job-level failure
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Chromium could not be located, downloaded or started
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    /// The target page could not be loaded (DNS, network, browser error)
    #[error("Failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Navigation did not settle within the configured timeout
    #[error("Navigation to {url} timed out after {}s", timeout.as_secs())]
    NavigationTimeout { url: String, timeout: Duration },

    /// The target responded with something other than an HTML document
    #[error("{url} is not an HTML page (content type: {content_type})")]
    NotHtml { url: String, content_type: String },

    /// The job URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The search query is empty or too long
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// The queue is bounded and already holds `depth` waiting jobs
    #[error("Scrape queue is full ({depth} jobs waiting)")]
    QueueFull { depth: usize },

    /// The job task ended without producing a result (panic inside the job)
    #[error("Scrape job aborted: {0}")]
    JobAborted(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(error: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::BrowserLaunch(format!("{error:#}"))
    }
}
