//! Shopping search results
//!
//! Builds the shopping-vertical search URL for a query and extracts the
//! ordered result cards from the rendered results page.

mod extract;
mod types;

pub use extract::SearchResultPipeline;
pub use types::{
    IMAGE_SELECTOR, LINK_SELECTOR, NAME_SELECTORS, PRICE_SELECTOR, RESULT_CONTAINER_SELECTOR,
    RESULTS_WAIT_TIMEOUT_SECS, SearchResultItem, SearchSelectors,
};

use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::MAX_QUERY_LENGTH;

/// Trim and validate a user query
///
/// Rejects empty or whitespace-only queries and queries longer than
/// [`MAX_QUERY_LENGTH`] characters.
pub fn validate_query(query: &str) -> ScrapeResult<String> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidQuery(
            "query cannot be empty or whitespace-only".to_string(),
        ));
    }

    let chars = trimmed.chars().count();
    if chars > MAX_QUERY_LENGTH {
        return Err(ScrapeError::InvalidQuery(format!(
            "query is too long ({chars} characters, maximum {MAX_QUERY_LENGTH})"
        )));
    }

    Ok(trimmed.to_string())
}

/// Shopping results URL for `query`
///
/// `query` is expected to be validated already; it is percent-encoded here.
#[must_use]
pub fn build_search_url(origin: &str, language: &str, query: &str) -> String {
    format!(
        "{}/search?tbm=shop&hl={}&q={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(language),
        urlencoding::encode(query)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  tênis corrida ").unwrap(), "tênis corrida");
        assert!(matches!(validate_query("   "), Err(ScrapeError::InvalidQuery(_))));
        assert!(validate_query(&"a".repeat(MAX_QUERY_LENGTH)).is_ok());
        assert!(validate_query(&"a".repeat(MAX_QUERY_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_build_search_url_encodes_query() {
        assert_eq!(
            build_search_url("https://www.google.com/", "pt-BR", "tênis & meia"),
            "https://www.google.com/search?tbm=shop&hl=pt-BR&q=t%C3%AAnis%20%26%20meia"
        );
    }
}
