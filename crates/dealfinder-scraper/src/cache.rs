//! Time-bounded snapshot cache keyed by store.
//!
//! The cache file is one JSON object mapping a store key to a
//! [`CacheEntry`]. Reading is forgiving: a missing or corrupt file is an
//! empty cache, and an entry that cannot be understood is a miss. Entries
//! are never evicted; a stale one simply fails the freshness check until the
//! next live scrape overwrites it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use dealfinder_core::DealRecord;

use crate::error::ScraperError;

/// Key used when no store number is given (the generic weekly ad).
pub const ALL_STORES_KEY: &str = "ALL";

/// Cache key for a store: the store number itself, or [`ALL_STORES_KEY`].
#[must_use]
pub fn build_key(store_number: Option<&str>) -> String {
    store_number.map_or_else(|| ALL_STORES_KEY.to_string(), str::to_string)
}

/// Snapshot of one live scrape.
///
/// `all_deals` holds every product found on the page so that any later
/// query within the TTL can be answered from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Seconds since the Unix epoch when the scrape finished.
    pub timestamp: f64,
    pub search_items: Vec<String>,
    pub store_number: Option<String>,
    pub total_products: usize,
    pub all_deals: Vec<DealRecord>,
    pub matching_deals: Vec<DealRecord>,
}

impl CacheEntry {
    /// Builds an entry stamped with the current time.
    #[must_use]
    pub fn new(
        search_items: Vec<String>,
        store_number: Option<String>,
        all_deals: Vec<DealRecord>,
        matching_deals: Vec<DealRecord>,
    ) -> Self {
        Self {
            timestamp: now_epoch_secs(),
            search_items,
            store_number,
            total_products: all_deals.len(),
            all_deals,
            matching_deals,
        }
    }

    /// Seconds elapsed between the snapshot and `now`.
    #[must_use]
    pub fn age_secs(&self, now: f64) -> f64 {
        now - self.timestamp
    }

    /// Decodes an entry leniently.
    ///
    /// A missing or non-numeric `timestamp` makes the entry unusable, as does
    /// a `store_number`, `search_items` or `total_products` of the wrong
    /// type. Deal lists are forgiving: when `all_deals` is absent or
    /// malformed, `matching_deals` stands in for it (files written before
    /// full snapshots were cached only stored matches), and a malformed
    /// `matching_deals` is empty.
    fn from_value(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let timestamp = obj.get("timestamp").and_then(Value::as_f64)?;

        let deals = |field: &str| -> Option<Vec<DealRecord>> {
            obj.get(field)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        };
        let matching_deals = deals("matching_deals").unwrap_or_default();
        let all_deals = deals("all_deals").unwrap_or_else(|| matching_deals.clone());

        let search_items = match obj.get("search_items") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(item)) => vec![item.clone()],
            Some(v) => serde_json::from_value(v.clone()).ok()?,
        };
        let store_number = match obj.get("store_number") {
            None | Some(Value::Null) => None,
            Some(Value::String(store)) => Some(store.clone()),
            Some(_) => return None,
        };
        let total_products = match obj.get("total_products") {
            None | Some(Value::Null) => all_deals.len(),
            Some(v) => usize::try_from(v.as_u64()?).ok()?,
        };

        Some(Self {
            timestamp,
            search_items,
            store_number,
            total_products,
            all_deals,
            matching_deals,
        })
    }
}

/// Current time as fractional seconds since the Unix epoch.
#[must_use]
pub fn now_epoch_secs() -> f64 {
    // Millisecond timestamps stay far below 2^52 until the year 142,000.
    #[allow(clippy::cast_precision_loss)]
    let millis = chrono::Utc::now().timestamp_millis() as f64;
    millis / 1000.0
}

/// In-memory view of the cache file.
#[derive(Debug, Default)]
pub struct ResultCache {
    path: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl ResultCache {
    /// Loads the cache file at `path`.
    ///
    /// Never fails: a missing file, unreadable file, invalid JSON, or a
    /// top-level value that is not an object all produce an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    tracing::warn!(path = %path.display(), "cache file is not a JSON object; ignoring");
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cache file is not valid JSON; ignoring");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no cache file yet");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache file unreadable; ignoring");
                Map::new()
            }
        };

        Self {
            path: Some(path),
            entries,
        }
    }

    /// A cache with no backing file; [`ResultCache::save`] is a no-op.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the entry for `key` if it is younger than `ttl_secs`.
    #[must_use]
    pub fn read(&self, key: &str, ttl_secs: u64) -> Option<CacheEntry> {
        self.read_at(key, ttl_secs, now_epoch_secs())
    }

    /// [`ResultCache::read`] evaluated at an explicit `now`.
    #[must_use]
    pub fn read_at(&self, key: &str, ttl_secs: u64, now: f64) -> Option<CacheEntry> {
        let Some(entry) = self.entries.get(key).and_then(CacheEntry::from_value) else {
            tracing::debug!(key, "cache miss");
            return None;
        };

        let age = entry.age_secs(now);
        // TTLs are configured in seconds and never approach 2^52.
        #[allow(clippy::cast_precision_loss)]
        let ttl = ttl_secs as f64;
        if age > ttl {
            tracing::debug!(key, age_secs = age, ttl_secs, "cache entry expired");
            return None;
        }

        tracing::debug!(key, age_secs = age, "cache hit");
        Some(entry)
    }

    /// Stores `entry` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CacheSerialize`] if the entry cannot be
    /// represented as JSON.
    pub fn write(&mut self, key: &str, entry: &CacheEntry) -> Result<(), ScraperError> {
        let value = serde_json::to_value(entry)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Removes the entry for `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All keys with their decoded entries; undecodable entries map to `None`.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Option<CacheEntry>)> {
        self.entries
            .iter()
            .map(|(key, raw)| (key.clone(), CacheEntry::from_value(raw)))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache back to its file as pretty-printed JSON, creating the
    /// parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CacheIo`] on filesystem errors.
    pub fn save(&self) -> Result<(), ScraperError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source| ScraperError::CacheIo {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, body).map_err(io_err)?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "cache saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
