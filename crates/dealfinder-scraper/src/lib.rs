//! Weekly-ad deal extraction.
//!
//! The pipeline runs leaf-first: [`dom`] exposes the parsed page,
//! [`locator`] finds product containers around price text, [`extract`]
//! turns each container into a [`DealRecord`] using [`classify`], and
//! [`collect`] ties the two together for a whole page. [`filter`] and
//! [`cache`] operate on the resulting product list, and [`pipeline`]
//! orchestrates a full search against a [`fetch::PageSource`].

pub mod cache;
pub mod classify;
pub mod collect;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod locator;
pub mod pipeline;
mod rate_limit;

pub use cache::{build_key, CacheEntry, ResultCache, ALL_STORES_KEY};
pub use classify::{categorize_deal, detect_bogo, extract_savings, find_prices};
pub use collect::{collect_deals, collect_from_html};
pub use dom::{DealNode, HtmlDocument};
pub use error::ScraperError;
pub use extract::{extract_deal, extract_from_text};
pub use fetch::{weekly_ad_url, FilePageSource, HttpPageSource, PageSource};
pub use filter::filter_deals;
pub use locator::{locate_containers, LocatorConfig};
pub use pipeline::{DealFinder, FinderOptions, SearchOutcome, SearchRequest};

pub use dealfinder_core::{DealRecord, DealType};
