//! Whole-page deal collection.

use dealfinder_core::DealRecord;

use crate::dom::HtmlDocument;
use crate::extract::extract_deal;
use crate::locator::{locate_containers, LocatorConfig};

/// Locates every deal container in `document` and extracts a record from
/// each. Containers that yield no deal are skipped.
#[must_use]
pub fn collect_deals(document: &HtmlDocument, config: &LocatorConfig) -> Vec<DealRecord> {
    let anchors = document.price_anchors();
    let anchor_count = anchors.len();
    let containers = locate_containers(anchors, config);
    let container_count = containers.len();

    let deals: Vec<DealRecord> = containers.iter().filter_map(extract_deal).collect();

    tracing::info!(
        price_anchors = anchor_count,
        containers = container_count,
        deals = deals.len(),
        "collected deals from page"
    );
    deals
}

/// Parses `html` and collects its deals.
#[must_use]
pub fn collect_from_html(html: &str, config: &LocatorConfig) -> Vec<DealRecord> {
    let document = HtmlDocument::parse(html);
    collect_deals(&document, config)
}
