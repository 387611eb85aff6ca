//! `PageQuery` over an HTML snapshot
//!
//! Used for offline extraction of saved pages and for exercising the
//! pipelines without a browser. No scripts run, so image dimensions come
//! from the declared `width`/`height` attributes.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::{ImageCandidate, PageQuery, Probe, Source, non_empty};
use crate::utils::is_usable_image_src;

/// An HTML document plus the URL it was loaded from
///
/// Holds the raw markup and parses it per query: `scraper::Html` is not
/// `Send`, and queries must be usable from spawned tasks.
#[derive(Debug, Clone)]
pub struct StaticPage {
    html: String,
    url: Option<String>,
}

impl StaticPage {
    #[must_use]
    pub fn new(html: impl Into<String>, url: Option<String>) -> Self {
        Self {
            html: html.into(),
            url,
        }
    }

    fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    fn first_value(&self, probe: Probe<'_>) -> Option<String> {
        let selector = parse_selector(probe.selector)?;
        let document = self.document();
        let element = document.select(&selector).next()?;
        non_empty(read(element, probe.source))
    }

    fn scoped_values(&self, container: &str, probes: &[Probe<'_>]) -> Vec<Vec<Option<String>>> {
        let Some(container) = parse_selector(container) else {
            return Vec::new();
        };
        let selectors: Vec<Option<Selector>> =
            probes.iter().map(|p| parse_selector(p.selector)).collect();
        let document = self.document();

        document
            .select(&container)
            .map(|root| {
                probes
                    .iter()
                    .zip(&selectors)
                    .map(|(probe, selector)| {
                        let element = root.select(selector.as_ref()?).next()?;
                        non_empty(read(element, probe.source))
                    })
                    .collect()
            })
            .collect()
    }

    fn scripts(&self) -> Vec<String> {
        let Some(selector) = parse_selector(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };
        let document = self.document();
        document
            .select(&selector)
            .map(|script| script.text().collect::<String>())
            .collect()
    }

    fn title(&self) -> Option<String> {
        let selector = parse_selector("title")?;
        let document = self.document();
        let title = document.select(&selector).next()?;
        non_empty(Some(visible_text(title)))
    }

    fn images(&self, limit: usize) -> Vec<ImageCandidate> {
        let Some(selector) = parse_selector("img") else {
            return Vec::new();
        };
        let document = self.document();
        document
            .select(&selector)
            .take(limit)
            .map(|img| {
                let element = img.value();
                let src = element
                    .attr("src")
                    .filter(|s| is_usable_image_src(s))
                    .or_else(|| element.attr("data-src").filter(|s| is_usable_image_src(s)))
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                ImageCandidate {
                    src,
                    width: parse_dimension(element.attr("width")),
                    height: parse_dimension(element.attr("height")),
                }
            })
            .collect()
    }
}

impl PageQuery for StaticPage {
    async fn probe(&self, probe: Probe<'_>) -> Option<String> {
        self.first_value(probe)
    }

    async fn probe_scoped(
        &self,
        container: &str,
        probes: &[Probe<'_>],
    ) -> Vec<Vec<Option<String>>> {
        self.scoped_values(container, probes)
    }

    async fn json_ld_blocks(&self) -> Vec<String> {
        self.scripts()
    }

    async fn document_title(&self) -> Option<String> {
        self.title()
    }

    async fn image_candidates(&self, limit: usize) -> Vec<ImageCandidate> {
        self.images(limit)
    }

    async fn current_url(&self) -> Option<String> {
        self.url.clone()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            trace!("Invalid selector '{selector}': {e}");
            None
        }
    }
}

fn read(element: ElementRef<'_>, source: Source<'_>) -> Option<String> {
    match source {
        Source::Text => Some(visible_text(element)),
        Source::Attr(name) => element.value().attr(name).map(str::to_string),
    }
}

/// Text content with whitespace runs collapsed, approximating `innerText`
fn visible_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Parse `width="300"` / `width="300px"`; anything else is 0
fn parse_dimension(value: Option<&str>) -> u32 {
    value
        .map(|v| v.trim().trim_end_matches("px"))
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or(0, |v| v.round() as u32)
}
