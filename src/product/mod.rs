//! Product page extraction.
//!
//! A layered fallback pipeline: independent strategies each try to read
//! title, price and image from a rendered page, the first value found for a
//! field wins, and the raw price text is normalized at the end.

pub mod image;
pub mod pipeline;
pub mod price;
pub mod strategies;
pub mod types;

pub use crate::page_query::ImageCandidate;
pub use pipeline::ProductPipeline;
pub use price::NormalizedPrice;
pub use strategies::{Strategy, StrategyContext, parse_json_ld};
pub use types::{Field, ProductRecord, RawCandidate};
