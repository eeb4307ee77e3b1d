//! Console rendering for search results and cache listings.
//!
//! Renderers return `String`s so the layout can be tested without capturing
//! stdout.

use dealfinder_core::{DealRecord, DealType};
use dealfinder_scraper::{CacheEntry, SearchOutcome};

const RULE_WIDTH: usize = 80;

/// BOGO and Discount counts over `deals`.
pub(crate) fn summarize(deals: &[DealRecord]) -> (usize, usize) {
    let bogo = deals.iter().filter(|d| d.is_bogo).count();
    let discount = deals
        .iter()
        .filter(|d| d.deal_type == DealType::Discount)
        .count();
    (bogo, discount)
}

fn deal_type_marker(deal_type: DealType) -> &'static str {
    match deal_type {
        DealType::Bogo => "🎁",
        DealType::Discount => "💵",
        DealType::PriceDrop => "📉",
        DealType::Deal => "🏷️",
    }
}

/// Renders one matching deal as a numbered block.
pub(crate) fn render_deal(deal: &DealRecord, index: usize) -> String {
    let mut lines = vec![
        String::new(),
        "=".repeat(RULE_WIDTH),
        format!("#{index}. {}", deal.product_name),
        "-".repeat(RULE_WIDTH),
        format!(
            "{} Deal Type: {}",
            deal_type_marker(deal.deal_type),
            deal.deal_type
        ),
    ];
    if deal.is_bogo {
        lines.push("🎁 BUY 1 GET 1 FREE!".to_string());
    }
    if let Some(price) = &deal.current_price {
        lines.push(format!("💰 Price: {price}"));
    }
    if let Some(savings) = &deal.savings {
        lines.push(format!("💵 Savings: {savings}"));
    }
    if let Some(details) = &deal.deal_description {
        lines.push(format!("📋 Details: {details}"));
    }
    lines.join("\n") + "\n"
}

/// Human-readable age, e.g. `42s`, `17m`, `2h 05m`.
pub(crate) fn format_age(secs: f64) -> String {
    // Ages are non-negative and far below u64::MAX seconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = secs.max(0.0).round() as u64;
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s => format!("{}h {:02}m", s / 3600, (s % 3600) / 60),
    }
}

fn format_timestamp(epoch_secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let secs = epoch_secs.floor() as i64;
    chrono::DateTime::from_timestamp(secs, 0).map_or_else(
        || format!("{epoch_secs:.0}"),
        |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Renders the full search report.
pub(crate) fn render_outcome(outcome: &SearchOutcome, now: f64) -> String {
    let terms = outcome.search_items.join("', '");
    let store = outcome
        .store_number
        .as_deref()
        .map_or_else(|| "all stores (generic weekly ad)".to_string(), |s| format!("#{s}"));

    let mut out = vec![
        format!("🔍 Searching for: '{terms}'"),
        format!("📍 Store: {store}"),
    ];
    if outcome.from_cache {
        out.push(format!(
            "♻️  Using cached results from {} ({} old)",
            format_timestamp(outcome.snapshot_timestamp),
            format_age(now - outcome.snapshot_timestamp)
        ));
    }
    out.push(format!("✅ Found {} total products", outcome.total_products));
    out.push(format!(
        "✅ Found {} matching '{terms}'",
        outcome.matching_deals.len()
    ));
    out.push(String::new());

    if outcome.matching_deals.is_empty() {
        out.extend(
            [
                "😞 No deals found for your search",
                "",
                "💡 Tips:",
                "   - Try broader search terms (e.g., 'lay' instead of 'frito lay party size')",
                "   - Check if the item is actually on sale this week",
                "   - Try a different store number",
            ]
            .map(str::to_string),
        );
        return out.join("\n") + "\n";
    }

    out.push(format!(
        "🎉 FOUND {} DEAL(S):",
        outcome.matching_deals.len()
    ));
    let mut rendered = out.join("\n") + "\n";
    for (i, deal) in outcome.matching_deals.iter().enumerate() {
        rendered.push_str(&render_deal(deal, i + 1));
    }

    let (bogo, discount) = summarize(&outcome.matching_deals);
    rendered.push_str(&format!(
        "\n{}\n\n📊 Summary: {bogo} BOGO deals, {discount} Discounts\n",
        "=".repeat(RULE_WIDTH)
    ));
    rendered
}

/// Renders `cache show` output.
pub(crate) fn render_cache_listing(
    entries: &[(String, Option<CacheEntry>)],
    ttl_secs: u64,
    now: f64,
) -> String {
    if entries.is_empty() {
        return "cache is empty\n".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let ttl = ttl_secs as f64;
    let mut lines = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let line = match entry {
            Some(entry) => {
                let age = entry.age_secs(now);
                let status = if age > ttl { "stale" } else { "fresh" };
                format!(
                    "{key:<8} {status:<6} age {:<8} {} products, last search: {}",
                    format_age(age),
                    entry.total_products,
                    entry.search_items.join(", ")
                )
            }
            None => format!("{key:<8} unreadable"),
        };
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(name: &str, deal_type: DealType, is_bogo: bool) -> DealRecord {
        DealRecord {
            product_name: name.to_string(),
            current_price: Some("$5.99".to_string()),
            savings: None,
            deal_type,
            deal_description: is_bogo.then(|| "Buy 1 Get 1 Free".to_string()),
            is_bogo,
            full_text: String::new(),
        }
    }

    fn outcome(matching: Vec<DealRecord>, from_cache: bool) -> SearchOutcome {
        SearchOutcome {
            search_items: vec!["chicken".to_string()],
            store_number: Some("0865".to_string()),
            total_products: 12,
            all_deals: matching.clone(),
            matching_deals: matching,
            from_cache,
            snapshot_timestamp: 1_700_000_000.0,
        }
    }

    #[test]
    fn summarize_counts_bogo_and_discount() {
        let deals = vec![
            deal("Chicken Breast", DealType::Bogo, true),
            deal("Chicken Thighs", DealType::Discount, false),
            deal("Chicken Wings", DealType::PriceDrop, false),
        ];
        assert_eq!(summarize(&deals), (1, 1));
    }

    #[test]
    fn render_deal_includes_optional_lines() {
        let text = render_deal(&deal("Chicken Breast", DealType::Bogo, true), 1);
        assert!(text.contains("#1. Chicken Breast"));
        assert!(text.contains("Deal Type: BOGO"));
        assert!(text.contains("BUY 1 GET 1 FREE!"));
        assert!(text.contains("Price: $5.99"));
        assert!(text.contains("Details: Buy 1 Get 1 Free"));
        assert!(!text.contains("Savings:"));
    }

    #[test]
    fn render_outcome_lists_matches_and_summary() {
        let text = render_outcome(
            &outcome(vec![deal("Chicken Breast", DealType::Bogo, true)], false),
            1_700_000_000.0,
        );
        assert!(text.contains("Store: #0865"));
        assert!(text.contains("Found 12 total products"));
        assert!(text.contains("FOUND 1 DEAL(S)"));
        assert!(text.contains("Summary: 1 BOGO deals, 0 Discounts"));
        assert!(!text.contains("cached results"));
    }

    #[test]
    fn render_outcome_without_matches_prints_tips() {
        let text = render_outcome(&outcome(Vec::new(), false), 0.0);
        assert!(text.contains("No deals found for your search"));
        assert!(text.contains("Try a different store number"));
    }

    #[test]
    fn render_outcome_reports_cache_age() {
        let text = render_outcome(&outcome(Vec::new(), true), 1_700_000_000.0 + 125.0);
        assert!(text.contains("Using cached results from 2023-11-14 22:13 UTC (2m old)"));
    }

    #[test]
    fn format_age_buckets() {
        assert_eq!(format_age(42.0), "42s");
        assert_eq!(format_age(17.0 * 60.0), "17m");
        assert_eq!(format_age(2.0 * 3600.0 + 5.0 * 60.0), "2h 05m");
        assert_eq!(format_age(-3.0), "0s");
    }

    #[test]
    fn cache_listing_marks_stale_entries() {
        let fresh = CacheEntry {
            timestamp: 1_000.0,
            search_items: vec!["lay".to_string()],
            store_number: None,
            total_products: 3,
            all_deals: Vec::new(),
            matching_deals: Vec::new(),
        };
        let mut stale = fresh.clone();
        stale.timestamp = 0.0;
        let entries = vec![
            ("ALL".to_string(), Some(fresh)),
            ("0865".to_string(), Some(stale)),
            ("0001".to_string(), None),
        ];
        let text = render_cache_listing(&entries, 3600, 4_000.0);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ALL") && lines[0].contains("fresh"));
        assert!(lines[0].contains("3 products, last search: lay"));
        assert!(lines[1].contains("stale"));
        assert!(lines[2].contains("unreadable"));
    }

    #[test]
    fn empty_cache_listing() {
        assert_eq!(render_cache_listing(&[], 3600, 0.0), "cache is empty\n");
    }
}
