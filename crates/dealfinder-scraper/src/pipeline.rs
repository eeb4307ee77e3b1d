//! Search orchestration: cache lookup, page retrieval, collection, filtering.

use serde::Serialize;

use dealfinder_core::{AppConfig, ConfigError, DealRecord};

use crate::cache::{build_key, now_epoch_secs, CacheEntry, ResultCache};
use crate::collect::collect_from_html;
use crate::error::ScraperError;
use crate::fetch::{weekly_ad_url, PageSource};
use crate::filter::filter_deals;
use crate::locator::LocatorConfig;

/// What to search for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    search_items: Vec<String>,
    store_number: Option<String>,
}

impl SearchRequest {
    /// Builds a request from raw user input. Terms are trimmed and blank
    /// terms dropped; a blank store number means the generic weekly ad.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSearchTerms`] when no usable term remains.
    pub fn new<I, S>(search_items: I, store_number: Option<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let search_items: Vec<String> = search_items
            .into_iter()
            .map(|item| item.as_ref().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if search_items.is_empty() {
            return Err(ConfigError::NoSearchTerms);
        }

        let store_number = store_number
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            search_items,
            store_number,
        })
    }

    #[must_use]
    pub fn search_items(&self) -> &[String] {
        &self.search_items
    }

    #[must_use]
    pub fn store_number(&self) -> Option<&str> {
        self.store_number.as_deref()
    }
}

/// Run-wide settings, resolved once at the program boundary.
#[derive(Debug, Clone)]
pub struct FinderOptions {
    pub weekly_ad_url: String,
    pub use_cache: bool,
    pub cache_ttl_secs: u64,
    pub locator: LocatorConfig,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            weekly_ad_url: dealfinder_core::config::DEFAULT_WEEKLY_AD_URL.to_string(),
            use_cache: true,
            cache_ttl_secs: 3600,
            locator: LocatorConfig::default(),
        }
    }
}

impl FinderOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            weekly_ad_url: config.weekly_ad_url.clone(),
            use_cache: config.cache_enabled,
            cache_ttl_secs: config.cache_ttl_secs,
            locator: LocatorConfig::default(),
        }
    }
}

/// Result of one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub search_items: Vec<String>,
    pub store_number: Option<String>,
    pub total_products: usize,
    pub all_deals: Vec<DealRecord>,
    pub matching_deals: Vec<DealRecord>,
    pub from_cache: bool,
    /// Epoch seconds of the snapshot the results came from.
    pub snapshot_timestamp: f64,
}

/// Runs searches against the weekly ad.
#[derive(Debug, Clone, Default)]
pub struct DealFinder {
    options: FinderOptions,
}

impl DealFinder {
    #[must_use]
    pub fn new(options: FinderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &FinderOptions {
        &self.options
    }

    /// Answers `request` from a fresh cache snapshot when one exists, else
    /// scrapes the page via `source` and refreshes the cache.
    ///
    /// A cache hit re-filters the snapshot's full product list, so any query
    /// can be served from it.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the URL is invalid or the page cannot be
    /// retrieved. Cache write failures are logged, not returned.
    pub async fn run<P: PageSource>(
        &self,
        request: &SearchRequest,
        source: &P,
        cache: &mut ResultCache,
    ) -> Result<SearchOutcome, ScraperError> {
        let key = build_key(request.store_number());

        if self.options.use_cache {
            if let Some(entry) = cache.read(&key, self.options.cache_ttl_secs) {
                tracing::info!(
                    key = %key,
                    products = entry.all_deals.len(),
                    "using cached weekly ad snapshot"
                );
                let matching_deals = filter_deals(&entry.all_deals, request.search_items());
                return Ok(SearchOutcome {
                    search_items: request.search_items().to_vec(),
                    store_number: request.store_number.clone(),
                    total_products: entry.all_deals.len(),
                    all_deals: entry.all_deals,
                    matching_deals,
                    from_cache: true,
                    snapshot_timestamp: entry.timestamp,
                });
            }
        }

        let url = weekly_ad_url(&self.options.weekly_ad_url, request.store_number())?;
        let html = source.fetch_page(&url).await?;
        let all_deals = collect_from_html(&html, &self.options.locator);
        let matching_deals = filter_deals(&all_deals, request.search_items());
        tracing::info!(
            total = all_deals.len(),
            matching = matching_deals.len(),
            "weekly ad scraped"
        );

        let mut snapshot_timestamp = now_epoch_secs();
        if self.options.use_cache {
            let entry = CacheEntry::new(
                request.search_items().to_vec(),
                request.store_number.clone(),
                all_deals.clone(),
                matching_deals.clone(),
            );
            snapshot_timestamp = entry.timestamp;
            if let Err(e) = cache.write(&key, &entry).and_then(|()| cache.save()) {
                tracing::warn!(key = %key, error = %e, "failed to persist weekly ad snapshot");
            }
        }

        Ok(SearchOutcome {
            search_items: request.search_items().to_vec(),
            store_number: request.store_number.clone(),
            total_products: all_deals.len(),
            all_deals,
            matching_deals,
            from_cache: false,
            snapshot_timestamp,
        })
    }
}
