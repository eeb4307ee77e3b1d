//! Turns one located container into a [`DealRecord`].

use dealfinder_core::{DealRecord, UNKNOWN_PRODUCT};

use crate::classify::{categorize_deal, detect_bogo, extract_savings, find_prices};
use crate::dom::DealNode;

/// Containers whose text is shorter than this carry no usable listing.
const MIN_TEXT_CHARS: usize = 5;

/// Extracts a deal from a container element.
///
/// Returns `None` when the container has too little text or shows no sign of
/// a promotion (no BOGO wording, no savings, no buy/get or save line, and at
/// most one price).
pub fn extract_deal<N: DealNode>(container: &N) -> Option<DealRecord> {
    extract_from_lines(container.text_lines())
}

/// Extracts a deal from already-rendered container text.
///
/// Lines are trimmed and blank lines dropped before extraction, exactly as
/// for [`extract_deal`].
#[must_use]
pub fn extract_from_text(text: &str) -> Option<DealRecord> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    extract_from_lines(lines)
}

fn extract_from_lines(lines: Vec<String>) -> Option<DealRecord> {
    let full_text = lines.join("\n");
    if full_text.chars().count() < MIN_TEXT_CHARS {
        return None;
    }

    let product_name = lines
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

    let prices = find_prices(&full_text);
    let current_price = prices.first().cloned();
    let is_bogo = detect_bogo(&full_text);
    let savings = extract_savings(&full_text);
    let deal_description = describe_deal(&lines);
    let deal_type = categorize_deal(&full_text, &prices);

    let has_deal =
        is_bogo || savings.is_some() || deal_description.is_some() || prices.len() > 1;
    if !has_deal {
        tracing::debug!(product_name = %product_name, "container has no deal signal; skipping");
        return None;
    }

    Some(DealRecord {
        product_name,
        current_price,
        savings,
        deal_type,
        deal_description,
        is_bogo,
        full_text,
    })
}

/// First line mentioning both "buy" and "get", else the first "save" line.
///
/// Lines are scanned once; whichever kind appears first wins.
fn describe_deal(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find(|line| {
            let lower = line.to_lowercase();
            (lower.contains("buy") && lower.contains("get")) || lower.contains("save")
        })
        .cloned()
}
