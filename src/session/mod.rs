//! Single-use browser session
//!
//! A `BrowserSession` owns one Chromium process and one page for the
//! duration of one job: open, navigate once, extract, close. Sessions are
//! never pooled, so cookies, scroll position and in-page script state cannot
//! leak between jobs.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::browser_setup::launch_browser;
use crate::config::ScrapeConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::page_query::js_scripts::{
    DOCUMENT_TITLE_SCRIPT, JSON_LD_SCRIPT, PAGE_STATE_SCRIPT, image_candidates_script,
    lazy_scroll_script, scoped_probe_script,
};
use crate::page_query::{ImageCandidate, PageQuery, Probe, Source, non_empty};

mod network;

use network::NetworkActivity;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageState {
    content_type: String,
}

/// One Chromium instance plus one page, released by [`BrowserSession::close`]
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Option<Page>,
    user_data_dir: Option<PathBuf>,
    scroll_step_px: u32,
    scroll_interval: Duration,
    max_scroll_steps: u32,
}

impl BrowserSession {
    /// Launch an isolated headless browser and open a blank page
    pub async fn open(config: &ScrapeConfig) -> ScrapeResult<Self> {
        let id = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let user_data_dir = std::env::temp_dir().join(format!(
            "shopscrape_chrome_{}_{id}",
            std::process::id()
        ));

        let (browser, handler) = match launch_browser(config, &user_data_dir).await {
            Ok(launched) => launched,
            Err(e) => {
                remove_profile_dir(&user_data_dir);
                return Err(e.into());
            }
        };

        let page = browser.new_page("about:blank").await;
        let mut session = Self {
            browser: Some(browser),
            handler: Some(handler),
            page: None,
            user_data_dir: Some(user_data_dir),
            scroll_step_px: config.scroll_step_px(),
            scroll_interval: config.scroll_interval(),
            max_scroll_steps: config.max_scroll_steps(),
        };

        match page {
            Ok(page) => {
                session.page = Some(page);
                debug!("Browser session {id} opened");
                Ok(session)
            }
            Err(e) => {
                session.close().await;
                Err(ScrapeError::BrowserLaunch(format!(
                    "Failed to create page: {e}"
                )))
            }
        }
    }

    fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Load `url` and wait until the network is idle.
    ///
    /// The whole sequence (navigation, load event, idle wait) shares one
    /// `timeout`. Fails with `NavigationTimeout` when it elapses, with
    /// `Navigation` when the host is unreachable, and with `NotHtml` when the
    /// response is not a document.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> ScrapeResult<()> {
        let page = self.page().ok_or_else(|| ScrapeError::Navigation {
            url: url.to_string(),
            reason: "session is closed".to_string(),
        })?;

        info!("Navigating to {url} (timeout {}s)", timeout.as_secs());
        let started = Instant::now();

        // Subscribe first so the document request itself is counted
        let mut network = NetworkActivity::subscribe(page).await;

        let load = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, load).await {
            Err(_) => {
                return Err(ScrapeError::NavigationTimeout {
                    url: url.to_string(),
                    timeout,
                });
            }
            Ok(Err(e)) => {
                return Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Ok(Ok(())) => {}
        }

        let remaining = timeout.saturating_sub(started.elapsed());
        if let Some(network) = network.as_mut()
            && tokio::time::timeout(remaining, network.wait_for_idle())
                .await
                .is_err()
        {
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            });
        }
        drop(network);

        let state: Option<PageState> = self.eval_value(PAGE_STATE_SCRIPT).await;
        if let Some(state) = state
            && !is_html_content_type(&state.content_type)
        {
            return Err(ScrapeError::NotHtml {
                url: url.to_string(),
                content_type: state.content_type,
            });
        }

        debug!(
            "Navigation to {url} settled after {:.2}s",
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Scroll to the bottom in fixed steps so lazy-loaded images start loading.
    ///
    /// Best-effort: a failure is logged and extraction proceeds.
    pub async fn trigger_lazy_load(&self) {
        let Some(page) = self.page() else {
            return;
        };
        let script = lazy_scroll_script(
            self.scroll_step_px,
            u64::try_from(self.scroll_interval.as_millis()).unwrap_or(u64::MAX),
            self.max_scroll_steps,
        );
        let params = match EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
        {
            Ok(params) => params,
            Err(e) => {
                warn!("Failed to build lazy-load script params: {e}");
                return;
            }
        };

        match page.evaluate_expression(params).await {
            Ok(result) => {
                let steps: u32 = result.into_value().unwrap_or_default();
                debug!("Lazy-load scroll finished after {steps} steps");
            }
            Err(e) => warn!("Lazy-load scroll failed: {e}"),
        }
    }

    /// Poll for `selector` until it appears or `max_wait` elapses
    pub async fn wait_for_selector(&self, selector: &str, max_wait: Duration) -> bool {
        let Some(page) = self.page() else {
            return false;
        };
        let start = Instant::now();
        loop {
            if page.find_element(selector).await.is_ok() {
                debug!(
                    "'{selector}' appeared after {:.2}s",
                    start.elapsed().as_secs_f64()
                );
                return true;
            }
            if start.elapsed() >= max_wait {
                debug!("'{selector}' not present after {}s", max_wait.as_secs());
                return false;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    /// Release the page and the browser process.
    ///
    /// Idempotent and safe after partial failure. Every step is best-effort;
    /// failures are logged, never returned.
    pub async fn close(&mut self) {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            trace!("Failed to close page: {e}");
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            // Wait for process to fully exit before removing its profile
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        if let Some(dir) = self.user_data_dir.take() {
            remove_profile_dir(&dir);
        }
    }

    /// Whether `close` has already run
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.browser.is_none() && self.page.is_none()
    }

    async fn eval_value<T: DeserializeOwned>(&self, script: &str) -> Option<T> {
        let page = self.page()?;
        match page.evaluate(script).await {
            Ok(result) => match result.into_value() {
                Ok(value) => Some(value),
                Err(e) => {
                    trace!("Failed to decode evaluation result: {e}");
                    None
                }
            },
            Err(e) => {
                trace!("Script evaluation failed: {e}");
                None
            }
        }
    }

    async fn first_element(&self, selector: &str) -> Option<Element> {
        match self.page()?.find_element(selector).await {
            Ok(element) => Some(element),
            Err(e) => {
                trace!("No element for '{selector}': {e}");
                None
            }
        }
    }
}

impl PageQuery for BrowserSession {
    async fn probe(&self, probe: Probe<'_>) -> Option<String> {
        let element = self.first_element(probe.selector).await?;
        let value = match probe.source {
            Source::Text => element.inner_text().await,
            Source::Attr(name) => element.attribute(name).await,
        };
        match value {
            Ok(value) => non_empty(value),
            Err(e) => {
                trace!("Failed to read '{}': {e}", probe.selector);
                None
            }
        }
    }

    async fn probe_scoped(
        &self,
        container: &str,
        probes: &[Probe<'_>],
    ) -> Vec<Vec<Option<String>>> {
        let script = scoped_probe_script(container, probes);
        let rows: Vec<Vec<Option<String>>> = self.eval_value(&script).await.unwrap_or_default();
        rows.into_iter()
            .map(|row| row.into_iter().map(non_empty).collect())
            .collect()
    }

    async fn json_ld_blocks(&self) -> Vec<String> {
        self.eval_value(JSON_LD_SCRIPT).await.unwrap_or_default()
    }

    async fn document_title(&self) -> Option<String> {
        non_empty(self.eval_value(DOCUMENT_TITLE_SCRIPT).await)
    }

    async fn image_candidates(&self, limit: usize) -> Vec<ImageCandidate> {
        self.eval_value(&image_candidates_script(limit))
            .await
            .unwrap_or_default()
    }

    async fn current_url(&self) -> Option<String> {
        match self.page()?.url().await {
            Ok(url) => url,
            Err(e) => {
                trace!("Failed to get page URL: {e}");
                None
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Fallback for sessions dropped without close(): Browser::drop kills
        // the child process, the handler must be stopped by hand
        if let Some(handler) = self.handler.take() {
            warn!("BrowserSession dropped without close() - aborting handler");
            handler.abort();
        }
        if let Some(dir) = self.user_data_dir.take() {
            remove_profile_dir(&dir);
        }
    }
}

fn remove_profile_dir(dir: &std::path::Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        warn!(
            "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
            dir.display(),
            e
        );
    }
}

/// `text/html` and XHTML variants; an empty type is accepted
fn is_html_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty() || essence == "text/html" || essence == "application/xhtml+xml"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html_content_type() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(is_html_content_type(""));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("image/png"));
    }
}
