//! Search-term matching over extracted deals.

use dealfinder_core::DealRecord;

/// Returns the deals whose product name contains any of `terms`,
/// case-insensitively, preserving the input order.
#[must_use]
pub fn filter_deals<S: AsRef<str>>(deals: &[DealRecord], terms: &[S]) -> Vec<DealRecord> {
    let terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();

    deals
        .iter()
        .filter(|deal| terms.iter().any(|term| deal.name_contains(term)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use dealfinder_core::DealType;

    use super::*;

    fn deal(name: &str) -> DealRecord {
        DealRecord {
            product_name: name.to_string(),
            current_price: Some("$1.00".to_string()),
            savings: None,
            deal_type: DealType::PriceDrop,
            deal_description: None,
            is_bogo: false,
            full_text: name.to_string(),
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let deals = vec![deal("Frito Lay Chips")];
        assert_eq!(filter_deals(&deals, &["LAY"]), filter_deals(&deals, &["lay"]));
        assert_eq!(filter_deals(&deals, &["lay"]).len(), 1);
    }

    #[test]
    fn terms_are_or_combined_and_order_independent() {
        let deals = vec![deal("Chicken Breast"), deal("Ice Cream"), deal("Paper Towels")];
        let a = filter_deals(&deals, &["cream", "chicken"]);
        let b = filter_deals(&deals, &["chicken", "cream"]);
        assert_eq!(a, b);
        let names: Vec<&str> = a.iter().map(|d| d.product_name.as_str()).collect();
        assert_eq!(names, vec!["Chicken Breast", "Ice Cream"]);
    }

    #[test]
    fn no_terms_match_nothing() {
        let deals = vec![deal("Chicken Breast")];
        let none: [&str; 0] = [];
        assert!(filter_deals(&deals, &none).is_empty());
        assert!(filter_deals(&deals, &["salmon"]).is_empty());
    }
}
