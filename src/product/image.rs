//! Image candidate selection
//!
//! Picks the image most likely to be the product photo from the `<img>`
//! elements of a page. Small images are assumed to be logos, icons or
//! tracking pixels.

use crate::page_query::ImageCandidate;
use crate::utils::is_usable_image_src;

/// Choose the product image from `candidates` (DOM order).
///
/// Candidates with an empty or inline (`data:`) source are ignored. Returns the first candidate
/// at least `min_dimension` wide AND tall; if none qualifies, the first
/// candidate; `None` if there are no candidates.
#[must_use]
pub fn select(candidates: &[ImageCandidate], min_dimension: u32) -> Option<&ImageCandidate> {
    let mut usable = candidates.iter().filter(|c| is_usable_image_src(&c.src));
    let first = usable.clone().next();

    usable
        .find(|c| c.width >= min_dimension && c.height >= min_dimension)
        .or(first)
}
