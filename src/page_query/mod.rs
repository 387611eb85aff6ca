//! Read-only DOM access for extraction.
//!
//! Extraction code never talks to chromiumoxide directly; it asks a
//! [`PageQuery`] for values. Every query is infallible at the type level:
//! a missing element, a missing attribute, or a DOM/CDP error all come back
//! as `None` (or an empty `Vec`), so the pipelines can treat "no value" as
//! ordinary control flow and move on to the next fallback.
//!
//! Two implementations exist:
//! - [`crate::session::BrowserSession`] - a live, rendered Chromium page
//! - [`StaticPage`] - an HTML snapshot parsed with `scraper`

pub mod js_scripts;
pub mod static_page;

use serde::{Deserialize, Serialize};
use std::future::Future;

pub use static_page::StaticPage;

/// Where a probe reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// Visible text of the element
    Text,
    /// A named attribute of the element
    Attr(&'a str),
}

/// A single "first element matching `selector`, read `source`" lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe<'a> {
    pub selector: &'a str,
    pub source: Source<'a>,
}

impl<'a> Probe<'a> {
    #[must_use]
    pub const fn text(selector: &'a str) -> Self {
        Self {
            selector,
            source: Source::Text,
        }
    }

    #[must_use]
    pub const fn attr(selector: &'a str, name: &'a str) -> Self {
        Self {
            selector,
            source: Source::Attr(name),
        }
    }
}

/// An `<img>` element found on the page
///
/// `width`/`height` are natural pixel dimensions on a live page and the
/// declared `width`/`height` attributes on a snapshot; 0 when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageCandidate {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl ImageCandidate {
    #[must_use]
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
        }
    }
}

/// Page-query capability consumed by the extraction pipelines
pub trait PageQuery: Sync {
    /// First element matching the probe's selector, read per its source.
    ///
    /// Values are trimmed; an empty result is `None`.
    fn probe(&self, probe: Probe<'_>) -> impl Future<Output = Option<String>> + Send;

    /// For each element matching `container` (DOM order), evaluate every
    /// probe inside that element. The inner `Vec` is parallel to `probes`.
    fn probe_scoped(
        &self,
        container: &str,
        probes: &[Probe<'_>],
    ) -> impl Future<Output = Vec<Vec<Option<String>>>> + Send;

    /// Raw text of every `<script type="application/ld+json">` block
    fn json_ld_blocks(&self) -> impl Future<Output = Vec<String>> + Send;

    /// `document.title`, trimmed; `None` when empty
    fn document_title(&self) -> impl Future<Output = Option<String>> + Send;

    /// The first `limit` `<img>` elements, `src` falling back to `data-src`
    fn image_candidates(&self, limit: usize)
    -> impl Future<Output = Vec<ImageCandidate>> + Send;

    /// URL of the loaded document, used to resolve relative paths
    fn current_url(&self) -> impl Future<Output = Option<String>> + Send;
}

/// Trim a raw DOM value, mapping empty strings to `None`
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}
