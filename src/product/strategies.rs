//! Independent extraction strategies
//!
//! Each strategy reads the page through [`PageQuery`] and returns a partial
//! [`RawCandidate`]. None of them can fail: anything missing or malformed
//! simply leaves the corresponding field unset.

use serde_json::Value;
use tracing::{debug, trace};

use super::image;
use super::types::{Field, RawCandidate};
use crate::page_query::{PageQuery, Probe};
use crate::utils::is_usable_image_src;

/// Settings the strategies need from `ScrapeConfig`
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext {
    pub image_candidate_limit: usize,
    pub min_image_dimension: u32,
}

/// Extraction strategies, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `application/ld+json` blocks describing a `Product`
    StructuredData,
    /// `og:title`, `<meta name="title">`, first `<h1>`, `document.title`
    MetaTitle,
    /// `og:image`, `<link rel="image_src">`, `[itemprop="image"]`
    MetaImage,
    /// `[itemprop="price"]`, then the first element with "price" in its class
    VisiblePrice,
    /// Largest-enough `<img>` among the first few on the page
    ImageFallback,
}

impl Strategy {
    /// Fixed priority order; earlier strategies win every field they set
    pub const ORDER: [Strategy; 5] = [
        Strategy::StructuredData,
        Strategy::MetaTitle,
        Strategy::MetaImage,
        Strategy::VisiblePrice,
        Strategy::ImageFallback,
    ];

    /// Fields this strategy can contribute
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Strategy::StructuredData => &[
                Field::Title,
                Field::Price,
                Field::PriceCurrency,
                Field::Image,
            ],
            Strategy::MetaTitle => &[Field::Title],
            Strategy::MetaImage | Strategy::ImageFallback => &[Field::Image],
            Strategy::VisiblePrice => &[Field::Price],
        }
    }

    /// Whether running this strategy could still change `acc`
    #[must_use]
    pub fn is_needed(self, acc: &RawCandidate) -> bool {
        self.fields().iter().any(|field| !acc.has(*field))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Strategy::StructuredData => "structured-data",
            Strategy::MetaTitle => "meta-title",
            Strategy::MetaImage => "meta-image",
            Strategy::VisiblePrice => "visible-price",
            Strategy::ImageFallback => "image-fallback",
        }
    }

    pub async fn run<P: PageQuery>(self, page: &P, ctx: StrategyContext) -> RawCandidate {
        let candidate = match self {
            Strategy::StructuredData => structured_data(page).await,
            Strategy::MetaTitle => meta_title(page).await,
            Strategy::MetaImage => meta_image(page).await,
            Strategy::VisiblePrice => visible_price(page).await,
            Strategy::ImageFallback => image_fallback(page, ctx).await,
        };
        if candidate.is_empty() {
            trace!("Strategy {} found nothing", self.name());
        } else {
            debug!("Strategy {} produced {:?}", self.name(), candidate);
        }
        candidate
    }
}

/// Return the first probe that yields a value
async fn first_of<P: PageQuery>(page: &P, probes: &[Probe<'_>]) -> Option<String> {
    for probe in probes {
        if let Some(value) = page.probe(*probe).await {
            return Some(value);
        }
    }
    None
}

/// Like [`first_of`], skipping values that are not fetchable images
async fn first_image_of<P: PageQuery>(page: &P, probes: &[Probe<'_>]) -> Option<String> {
    for probe in probes {
        if let Some(value) = page.probe(*probe).await
            && is_usable_image_src(&value)
        {
            return Some(value);
        }
    }
    None
}

pub async fn structured_data<P: PageQuery>(page: &P) -> RawCandidate {
    parse_json_ld(&page.json_ld_blocks().await)
}

pub async fn meta_title<P: PageQuery>(page: &P) -> RawCandidate {
    let title = match first_of(
        page,
        &[
            Probe::attr(r#"meta[property="og:title"]"#, "content"),
            Probe::attr(r#"meta[name="title"]"#, "content"),
            Probe::text("h1"),
        ],
    )
    .await
    {
        Some(title) => Some(title),
        None => page.document_title().await,
    };

    RawCandidate {
        title,
        ..RawCandidate::default()
    }
}

pub async fn meta_image<P: PageQuery>(page: &P) -> RawCandidate {
    let image = first_image_of(
        page,
        &[
            Probe::attr(r#"meta[property="og:image"]"#, "content"),
            Probe::attr(r#"link[rel="image_src"]"#, "href"),
            Probe::attr(r#"[itemprop="image"]"#, "src"),
            Probe::attr(r#"[itemprop="image"]"#, "content"),
        ],
    )
    .await;

    RawCandidate {
        image,
        ..RawCandidate::default()
    }
}

pub async fn visible_price<P: PageQuery>(page: &P) -> RawCandidate {
    let price = first_of(
        page,
        &[
            Probe::attr(r#"[itemprop="price"]"#, "content"),
            Probe::text(r#"[itemprop="price"]"#),
            Probe::text(r#"[class*="price"]"#),
        ],
    )
    .await;

    RawCandidate {
        price,
        ..RawCandidate::default()
    }
}

pub async fn image_fallback<P: PageQuery>(page: &P, ctx: StrategyContext) -> RawCandidate {
    let candidates = page.image_candidates(ctx.image_candidate_limit).await;
    let image = image::select(&candidates, ctx.min_image_dimension).map(|c| c.src.clone());

    RawCandidate {
        image,
        ..RawCandidate::default()
    }
}

/// Extract product fields from raw JSON-LD block texts.
///
/// Blocks that fail to parse are skipped. Top-level arrays and `@graph`
/// containers are flattened; every object typed `Product` contributes, the
/// first one to supply a field wins it.
#[must_use]
pub fn parse_json_ld(blocks: &[String]) -> RawCandidate {
    let mut nodes = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        match serde_json::from_str::<Value>(block) {
            Ok(value) => flatten_nodes(value, &mut nodes),
            Err(e) => trace!("Skipping malformed JSON-LD block {index}: {e}"),
        }
    }

    RawCandidate::merge_all(nodes.iter().filter(|node| is_product(node)).map(product_fields))
}

fn flatten_nodes(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_nodes(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_nodes(graph, out);
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

fn is_product(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(kind)) => kind == "Product",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("Product")),
        _ => false,
    }
}

fn product_fields(node: &Value) -> RawCandidate {
    let title = scalar(node.get("name")).or_else(|| scalar(node.get("headline")));
    let image = first_item(node.get("image"))
        .and_then(image_url)
        .filter(|src| is_usable_image_src(src));

    let offer = first_item(node.get("offers"));
    let price = offer.and_then(|o| scalar(o.get("price")).or_else(|| scalar(o.get("lowPrice"))));
    let price_currency = offer.and_then(|o| scalar(o.get("priceCurrency")));

    RawCandidate {
        title,
        price,
        price_currency,
        image,
    }
}

/// First element of an array, or the value itself
fn first_item(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Image may be a URL string or an `ImageObject`
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => scalar(value.get("url").or_else(|| value.get("contentUrl"))),
        other => scalar(Some(other)),
    }
}

/// Non-empty string or number as text
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
