//! Text-level deal classification.
//!
//! Every function here works on the raw container text and lowercases it
//! internally, so callers never need to normalize case first.

use std::sync::LazyLock;

use regex::Regex;

use dealfinder_core::DealType;

/// A price token as printed on the weekly ad, e.g. `$5.99`.
pub(crate) static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+\.\d{2}").expect("valid regex"));
static BUY_N_GET_M_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"buy\s*\d+\s*get\s*\d+").expect("valid regex"));
static SAVE_UP_TO_AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"save\s*up\s*to\s*\$(\d+\.\d{2})").expect("valid regex"));
static SAVE_AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"save\s*\$(\d+\.\d{2})").expect("valid regex"));

const BOGO_PHRASES: [&str; 4] = ["buy one get one", "buy 1 get 1", "b1g1", "buy one, get one"];

/// Returns `true` when the text advertises a buy-one-get-one style offer.
///
/// Matches `buy N get M`, the bare word `bogo`, and a few spelled-out forms.
#[must_use]
pub fn detect_bogo(text: &str) -> bool {
    let lower = text.to_lowercase();

    BUY_N_GET_M_RE.is_match(&lower)
        || lower.contains("bogo")
        || BOGO_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Classifies a promotion. Rules apply in order and the first match wins:
/// BOGO, then any "save" wording, then multiple prices, then plain `Deal`.
#[must_use]
pub fn categorize_deal<S: AsRef<str>>(text: &str, prices: &[S]) -> DealType {
    if detect_bogo(text) {
        return DealType::Bogo;
    }
    // "save up to" is a superset case of "save".
    if text.to_lowercase().contains("save") {
        return DealType::Discount;
    }
    if prices.len() > 1 {
        return DealType::PriceDrop;
    }
    DealType::Deal
}

/// Extracts the amount from "save up to $X.XX", falling back to "save $X.XX".
///
/// Returns the amount formatted as `$D.DD`.
#[must_use]
pub fn extract_savings(text: &str) -> Option<String> {
    let lower = text.to_lowercase();

    SAVE_UP_TO_AMOUNT_RE
        .captures(&lower)
        .or_else(|| SAVE_AMOUNT_RE.captures(&lower))
        .and_then(|caps| caps.get(1))
        .map(|amount| format!("${}", amount.as_str()))
}

/// All `$D.DD` tokens in document order.
#[must_use]
pub fn find_prices(text: &str) -> Vec<String> {
    PRICE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
