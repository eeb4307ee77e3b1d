use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings resolved from the environment.
///
/// Per-search settings (terms, store number) come from the CLI or the YAML
/// search profile and are merged on top of these defaults by the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub weekly_ad_url: String,
    pub cache_path: PathBuf,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub profile_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
