use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid weekly ad URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to read saved page {path}: {source}")]
    PageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file I/O error for {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialization error: {0}")]
    CacheSerialize(#[from] serde_json::Error),
}
