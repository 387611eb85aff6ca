//! Price normalization
//!
//! Turns raw price text such as `"R$ 1.234,56"` into a currency token and a
//! canonical decimal string (`"1234.56"`).
//!
//! The separator heuristic assumes Brazilian-Portuguese grouping: `.` groups
//! thousands, `,` marks decimals. Prices written the other way round
//! (`"1,234.56"`) are misparsed; this is a known limitation and is not
//! corrected here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Recognised currency tokens, in precedence order (`R$` before `$`)
pub const CURRENCY_TOKENS: [&str; 6] = ["R$", "BRL", "USD", "$", "EUR", "€"];

static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = CURRENCY_TOKENS
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("Invalid currency regex")
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+(?:[.,][0-9]+)*").expect("Invalid price number regex")
});

static THOUSANDS_DOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.([0-9]{3})\b").expect("Invalid thousands separator regex")
});

/// Result of normalizing one raw price text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedPrice {
    pub currency: Option<String>,
    pub value: Option<String>,
}

impl NormalizedPrice {
    /// `"<currency> <value with comma decimal>"` when both parts are known
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match (&self.currency, &self.value) {
            (Some(currency), Some(value)) => Some(format!("{currency} {}", value.replace('.', ","))),
            _ => None,
        }
    }
}

/// Normalize `raw` into currency and canonical decimal value.
///
/// A `known_currency` (from structured data) always wins over anything
/// found in the text.
#[must_use]
pub fn normalize(raw: &str, known_currency: Option<&str>) -> NormalizedPrice {
    let currency = known_currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| detect_currency(raw));

    NormalizedPrice {
        currency,
        value: parse_value(raw),
    }
}

/// First recognised currency token in `raw`
///
/// Matching is case-insensitive; the canonical spelling is returned.
#[must_use]
pub fn detect_currency(raw: &str) -> Option<String> {
    let found = CURRENCY_RE.find(raw)?.as_str();
    let canonical = CURRENCY_TOKENS
        .iter()
        .find(|token| token.eq_ignore_ascii_case(found))
        .map_or_else(|| found.to_string(), |token| (*token).to_string());
    Some(canonical)
}

/// Canonical decimal string for the first numeric run in `raw`
#[must_use]
pub fn parse_value(raw: &str) -> Option<String> {
    let number = NUMBER_RE.find(raw)?.as_str();
    let without_thousands = THOUSANDS_DOT_RE.replace_all(number, "$1");
    Some(without_thousands.replace(',', "."))
}
