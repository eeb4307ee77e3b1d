//! Page retrieval.
//!
//! The extraction pipeline only needs the rendered HTML of the weekly-ad
//! page. [`PageSource`] abstracts where it comes from: a live HTTP fetch or
//! a page saved to disk by a headless browser.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Supplies the rendered HTML for a weekly-ad URL.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// Builds the weekly-ad URL for `store_number`, or the generic ad when `None`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base_url` is not an absolute URL.
pub fn weekly_ad_url(base_url: &str, store_number: Option<&str>) -> Result<String, ScraperError> {
    let mut url = Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if let Some(store) = store_number {
        url.query_pairs_mut().append_pair("storeNumber", store);
    }
    Ok(url.to_string())
}

/// Fetches pages over HTTP with retry on transient failures.
///
/// Weekly-ad pages that render listings client-side will come back without
/// deals; use [`FilePageSource`] with a browser-rendered snapshot for those.
pub struct HttpPageSource {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpPageSource {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0);
            let domain = response.url().host_str().unwrap_or_default().to_string();
            return Err(ScraperError::RateLimited {
                domain,
                retry_after_secs,
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::info!(url, "fetching weekly ad page");
        let body =
            retry_with_backoff(self.max_retries, self.backoff_base_secs, || self.fetch_once(url))
                .await?;
        tracing::debug!(url, bytes = body.len(), "weekly ad page fetched");
        Ok(body)
    }
}

/// Serves a rendered page previously saved to disk, regardless of URL.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FilePageSource {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::info!(url, path = %self.path.display(), "reading saved weekly ad page");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ScraperError::PageRead {
                path: self.path.display().to_string(),
                source,
            })
    }
}
