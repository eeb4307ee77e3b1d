pub mod app_config;
pub mod config;
pub mod deals;
pub mod profile;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deals::{DealRecord, DealType, UNKNOWN_PRODUCT};
pub use profile::{load_search_profile, SearchProfile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read search profile {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse search profile: {0}")]
    ProfileParse(#[source] serde_yaml::Error),

    #[error("search profile validation error: {0}")]
    Validation(String),

    #[error("no search terms provided (pass --search or set search_items in the profile)")]
    NoSearchTerms,
}
