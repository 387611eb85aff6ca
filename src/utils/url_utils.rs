//! URL utilities.
//!
//! Helpers for validating job URLs and turning the relative paths found in
//! page markup into absolute URLs.

use url::Url;

/// Check if a URL is an absolute `http`/`https` URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Whether an image `src` can point at a fetchable image
///
/// Empty values and inline `data:`/`javascript:` URIs (lazy-load
/// placeholders, tracking pixels) are not usable.
#[must_use]
pub fn is_usable_image_src(src: &str) -> bool {
    let src = src.trim();
    let lower = src.get(..11).unwrap_or(src).to_ascii_lowercase();
    !src.is_empty() && !lower.starts_with("data:") && !lower.starts_with("javascript:")
}

/// Resolve `href` against `base`, returning an absolute `http`/`https` URL
///
/// Absolute inputs are returned unchanged (after parsing). Protocol-relative
/// (`//cdn/x.jpg`) and path-relative inputs are joined onto `base`.
/// Returns `None` for empty input, `data:`/`javascript:` URIs, and anything
/// that cannot be resolved.
#[must_use]
pub fn resolve_url(base: Option<&str>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("data:") || href.starts_with("javascript:") {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        return matches!(absolute.scheme(), "http" | "https").then(|| absolute.into());
    }

    let base = Url::parse(base?).ok()?;
    let joined = base.join(href).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_usable_image_src() {
        assert!(is_usable_image_src("/img/shoe.jpg"));
        assert!(is_usable_image_src("https://cdn.example.com/a.webp"));
        assert!(!is_usable_image_src("  "));
        assert!(!is_usable_image_src("data:image/gif;base64,R0lGODlhAQABAAAAACw="));
        assert!(!is_usable_image_src("DATA:image/png;base64,xyz"));
        assert!(!is_usable_image_src("javascript:void(0)"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/p/1"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn test_resolve_url_keeps_absolute() {
        assert_eq!(
            resolve_url(None, "https://x/a.jpg").as_deref(),
            Some("https://x/a.jpg")
        );
    }

    #[test]
    fn test_resolve_url_joins_relative() {
        let base = Some("https://shop.example.com/produtos/123");
        assert_eq!(
            resolve_url(base, "/img/a.jpg").as_deref(),
            Some("https://shop.example.com/img/a.jpg")
        );
        assert_eq!(
            resolve_url(base, "b.jpg").as_deref(),
            Some("https://shop.example.com/produtos/b.jpg")
        );
        assert_eq!(
            resolve_url(base, "//cdn.example.com/c.jpg").as_deref(),
            Some("https://cdn.example.com/c.jpg")
        );
    }

    #[test]
    fn test_resolve_url_rejects_unusable() {
        assert_eq!(resolve_url(Some("https://x"), ""), None);
        assert_eq!(resolve_url(Some("https://x"), "data:image/png;base64,AAAA"), None);
        assert_eq!(resolve_url(None, "/relative"), None);
    }
}
