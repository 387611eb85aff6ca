//! Data structures for product extraction

use serde::{Deserialize, Serialize};

/// Fields a strategy can contribute to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    PriceCurrency,
    Image,
}

/// Partial product data produced by one extraction strategy
///
/// `price` is raw text exactly as found; `image` may still be relative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    pub title: Option<String>,
    pub price: Option<String>,
    pub price_currency: Option<String>,
    pub image: Option<String>,
}

impl RawCandidate {
    /// First-wins merge: fields already set on `self` are never overwritten
    #[must_use]
    pub fn merge(self, later: RawCandidate) -> RawCandidate {
        RawCandidate {
            title: self.title.or(later.title),
            price: self.price.or(later.price),
            price_currency: self.price_currency.or(later.price_currency),
            image: self.image.or(later.image),
        }
    }

    /// Fold candidates left to right with [`RawCandidate::merge`]
    #[must_use]
    pub fn merge_all(candidates: impl IntoIterator<Item = RawCandidate>) -> RawCandidate {
        candidates
            .into_iter()
            .fold(RawCandidate::default(), RawCandidate::merge)
    }

    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_some(),
            Field::Price => self.price.is_some(),
            Field::PriceCurrency => self.price_currency.is_some(),
            Field::Image => self.image.is_some(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.price_currency.is_none()
            && self.image.is_none()
    }
}

/// Normalized result of a successful product scrape
///
/// Invariants: `title` is never empty (a placeholder is substituted);
/// `price` is set only when raw price text was found; `price_value` is set
/// only when that text contained a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub success: bool,
    pub url: String,
    pub title: String,
    pub price: Option<String>,
    pub price_value: Option<String>,
    pub price_currency: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: Option<&str>, price: Option<&str>) -> RawCandidate {
        RawCandidate {
            title: title.map(str::to_string),
            price: price.map(str::to_string),
            ..RawCandidate::default()
        }
    }

    #[test]
    fn test_merge_keeps_first_value() {
        let merged = candidate(Some("JSON-LD"), None).merge(candidate(Some("og:title"), Some("9,90")));
        assert_eq!(merged.title.as_deref(), Some("JSON-LD"));
        assert_eq!(merged.price.as_deref(), Some("9,90"));
    }

    #[test]
    fn test_merge_all_is_left_fold() {
        let merged = RawCandidate::merge_all([
            RawCandidate::default(),
            candidate(None, Some("R$ 1,00")),
            candidate(Some("Second"), Some("R$ 2,00")),
            RawCandidate {
                image: Some("/a.jpg".into()),
                title: Some("Third".into()),
                ..RawCandidate::default()
            },
        ]);
        assert_eq!(merged.title.as_deref(), Some("Second"));
        assert_eq!(merged.price.as_deref(), Some("R$ 1,00"));
        assert_eq!(merged.image.as_deref(), Some("/a.jpg"));
        assert!(merged.price_currency.is_none());
    }

    #[test]
    fn test_merge_all_empty() {
        let merged = RawCandidate::merge_all(Vec::new());
        assert!(merged.is_empty());
        assert!(!merged.has(Field::Title));
    }

    #[test]
    fn test_record_serializes_nulls() {
        let record = ProductRecord {
            success: true,
            url: "https://x".into(),
            title: "Shoe".into(),
            price: None,
            price_value: None,
            price_currency: None,
            image: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["price"].is_null());
        assert!(json["image"].is_null());
    }
}
