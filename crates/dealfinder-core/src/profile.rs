use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Saved search settings read from a YAML file.
///
/// ```yaml
/// search_items:
///   - frito lay
///   - chicken
/// store_number: "0865"
/// cache_ttl_secs: 1800
/// ```
///
/// Every field is optional; command-line arguments take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProfile {
    #[serde(default)]
    pub search_items: Vec<String>,
    pub store_number: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub use_cache: Option<bool>,
}

/// Load and validate a search profile from a YAML file.
///
/// Blank search items are dropped and a blank store number is treated as
/// absent.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_search_profile(path: &Path) -> Result<SearchProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_search_profile(&content)
}

fn parse_search_profile(content: &str) -> Result<SearchProfile, ConfigError> {
    let mut profile: SearchProfile =
        serde_yaml::from_str(content).map_err(ConfigError::ProfileParse)?;

    profile.search_items = profile
        .search_items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    profile.store_number = profile
        .store_number
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    validate_profile(&profile)?;

    Ok(profile)
}

fn validate_profile(profile: &SearchProfile) -> Result<(), ConfigError> {
    if let Some(store) = &profile.store_number {
        if !store.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(format!(
                "store_number '{store}' must contain only digits"
            )));
        }
    }

    Ok(())
}
