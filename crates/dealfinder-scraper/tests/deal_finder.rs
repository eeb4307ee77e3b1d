//! End-to-end tests for `DealFinder::run` over an in-memory page source.

use std::sync::atomic::{AtomicUsize, Ordering};

use dealfinder_scraper::{
    CacheEntry, DealFinder, DealType, FinderOptions, PageSource, ResultCache, ScraperError,
    SearchRequest,
};

const WEEKLY_AD: &str = r#"<html><body>
  <div class="weekly-ad-grid">
    <div class="product-card" data-product-id="1">
      <h3>Frito Lay Party Size Chips</h3>
      <span class="promo">Buy 1 Get 1 Free</span>
      <span class="price">$6.49</span>
    </div>
    <div class="product-card" data-product-id="2">
      <h3>Chicken Breast</h3>
      <span class="promo">Save up to $3.00</span>
      <span class="price">$7.99</span>
    </div>
    <div class="product-card" data-product-id="3">
      <h3>Lays Dip</h3>
      <span class="price">$3.29</span>
      <span class="was">$3.99</span>
    </div>
    <div class="product-card" data-product-id="4">
      <h3>Paper Towels</h3>
      <span class="price">$8.99</span>
    </div>
  </div>
</body></html>"#;

/// Serves a fixed page and counts fetches.
struct StaticPage {
    html: &'static str,
    fetches: AtomicUsize,
}

impl StaticPage {
    fn new(html: &'static str) -> Self {
        Self {
            html,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PageSource for StaticPage {
    async fn fetch_page(&self, _url: &str) -> Result<String, ScraperError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.to_string())
    }
}

struct FailingPage;

impl PageSource for FailingPage {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        Err(ScraperError::NotFound {
            url: url.to_string(),
        })
    }
}

fn finder(use_cache: bool) -> DealFinder {
    DealFinder::new(FinderOptions {
        weekly_ad_url: "https://ads.example.com/weekly".to_string(),
        use_cache,
        cache_ttl_secs: 3600,
        ..FinderOptions::default()
    })
}

#[tokio::test]
async fn live_scrape_filters_and_populates_cache() {
    let page = StaticPage::new(WEEKLY_AD);
    let mut cache = ResultCache::in_memory();
    let request = SearchRequest::new(["LAY"], Some("0865".to_string())).unwrap();

    let outcome = finder(true).run(&request, &page, &mut cache).await.unwrap();

    assert!(!outcome.from_cache);
    assert_eq!(outcome.total_products, 3);
    let names: Vec<&str> = outcome
        .matching_deals
        .iter()
        .map(|d| d.product_name.as_str())
        .collect();
    assert_eq!(names, vec!["Frito Lay Party Size Chips", "Lays Dip"]);
    assert_eq!(outcome.matching_deals[0].deal_type, DealType::Bogo);
    assert_eq!(outcome.matching_deals[1].deal_type, DealType::PriceDrop);

    let cached = cache.read("0865", 3600).expect("snapshot cached");
    assert_eq!(cached.all_deals, outcome.all_deals);
    assert_eq!(cached.search_items, vec!["LAY"]);
    assert_eq!(page.fetches(), 1);
}

#[tokio::test]
async fn fresh_snapshot_serves_new_query_without_fetch() {
    let page = StaticPage::new(WEEKLY_AD);
    let mut cache = ResultCache::in_memory();
    let finder = finder(true);

    let first = SearchRequest::new(["lay"], None).unwrap();
    finder.run(&first, &page, &mut cache).await.unwrap();

    let second = SearchRequest::new(["chicken"], None).unwrap();
    let outcome = finder.run(&second, &page, &mut cache).await.unwrap();

    assert!(outcome.from_cache);
    assert_eq!(page.fetches(), 1);
    assert_eq!(outcome.matching_deals.len(), 1);
    assert_eq!(outcome.matching_deals[0].product_name, "Chicken Breast");
    assert_eq!(outcome.matching_deals[0].savings.as_deref(), Some("$3.00"));
}

#[tokio::test]
async fn stale_snapshot_triggers_live_fetch() {
    let page = StaticPage::new(WEEKLY_AD);
    let mut cache = ResultCache::in_memory();
    let mut stale = CacheEntry::new(vec!["lay".into()], None, Vec::new(), Vec::new());
    stale.timestamp -= 7200.0;
    cache.write("ALL", &stale).unwrap();

    let request = SearchRequest::new(["lay"], None).unwrap();
    let outcome = finder(true).run(&request, &page, &mut cache).await.unwrap();

    assert!(!outcome.from_cache);
    assert_eq!(page.fetches(), 1);
    assert_eq!(outcome.matching_deals.len(), 2);
}

#[tokio::test]
async fn disabled_cache_always_fetches_and_never_writes() {
    let page = StaticPage::new(WEEKLY_AD);
    let mut cache = ResultCache::in_memory();
    let finder = finder(false);
    let request = SearchRequest::new(["towels"], None).unwrap();

    let outcome = finder.run(&request, &page, &mut cache).await.unwrap();
    finder.run(&request, &page, &mut cache).await.unwrap();

    assert!(outcome.matching_deals.is_empty());
    assert_eq!(page.fetches(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn retrieval_failure_is_returned() {
    let mut cache = ResultCache::in_memory();
    let request = SearchRequest::new(["lay"], None).unwrap();
    let result = finder(true).run(&request, &FailingPage, &mut cache).await;
    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    assert!(cache.is_empty());
}
