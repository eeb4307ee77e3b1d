use serde::{Deserialize, Serialize};

/// Product name used when a container yields no text lines at all.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Promotion kind assigned to a deal. Exactly one applies; see
/// `categorize_deal` in the scraper crate for precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealType {
    #[serde(rename = "BOGO")]
    Bogo,
    Discount,
    #[serde(rename = "Price Drop", alias = "PriceDrop")]
    PriceDrop,
    #[default]
    Deal,
}

impl DealType {
    /// Label used in reports and in the persisted cache.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DealType::Bogo => "BOGO",
            DealType::Discount => "Discount",
            DealType::PriceDrop => "Price Drop",
            DealType::Deal => "Deal",
        }
    }
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One promotion extracted from a weekly-ad listing container.
///
/// Prices are kept as the `$D.DD` strings found on the page; nothing is
/// converted to numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// First non-empty text line of the container.
    pub product_name: String,
    /// First `$D.DD` token in the container text.
    pub current_price: Option<String>,
    /// Amount from a "save [up to] $X.XX" phrase.
    pub savings: Option<String>,
    #[serde(default)]
    pub deal_type: DealType,
    /// First buy/get line, else first "save" line.
    pub deal_description: Option<String>,
    #[serde(default)]
    pub is_bogo: bool,
    /// Newline-joined container text, kept for debugging extraction.
    #[serde(default)]
    pub full_text: String,
}

impl DealRecord {
    /// Case-insensitive substring match of the product name against `term`.
    ///
    /// `term` must already be lowercased.
    #[must_use]
    pub fn name_contains(&self, term: &str) -> bool {
        self.product_name.to_lowercase().contains(term)
    }
}
