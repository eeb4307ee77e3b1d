//! The `search` command: merge settings, run the finder, print the report.

use anyhow::Context;

use dealfinder_core::{load_search_profile, AppConfig, ConfigError, SearchProfile};
use dealfinder_scraper::{
    DealFinder, FilePageSource, FinderOptions, HttpPageSource, ResultCache, SearchRequest,
};

use crate::report;
use crate::SearchArgs;

/// Combines CLI arguments, the optional search profile, and environment
/// config. CLI wins over the profile, which wins over the environment.
///
/// # Errors
///
/// Returns [`ConfigError::NoSearchTerms`] when neither the CLI nor the
/// profile provides a search term.
pub(crate) fn merge_search_settings(
    args: &SearchArgs,
    profile: Option<&SearchProfile>,
    config: &AppConfig,
) -> Result<(SearchRequest, FinderOptions), ConfigError> {
    let terms: Vec<String> = if args.search.iter().any(|t| !t.trim().is_empty()) {
        args.search.clone()
    } else {
        profile.map(|p| p.search_items.clone()).unwrap_or_default()
    };
    let store = args
        .store
        .clone()
        .or_else(|| profile.and_then(|p| p.store_number.clone()));
    let request = SearchRequest::new(terms, store)?;

    let mut options = FinderOptions::from_config(config);
    if let Some(profile) = profile {
        options.use_cache = profile.use_cache.unwrap_or(options.use_cache);
        options.cache_ttl_secs = profile.cache_ttl_secs.unwrap_or(options.cache_ttl_secs);
    }
    if args.no_cache {
        options.use_cache = false;
    }
    if let Some(ttl) = args.cache_ttl {
        options.cache_ttl_secs = ttl;
    }

    Ok((request, options))
}

pub(crate) async fn run_search(args: &SearchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let profile_path = args.config.as_ref().or(config.profile_path.as_ref());
    let profile = profile_path
        .map(|path| load_search_profile(path))
        .transpose()
        .context("failed to load search profile")?;

    let (request, options) = merge_search_settings(args, profile.as_ref(), config)?;
    tracing::info!(
        terms = ?request.search_items(),
        store = request.store_number().unwrap_or("ALL"),
        use_cache = options.use_cache,
        "starting weekly ad search"
    );

    let mut cache = if options.use_cache {
        ResultCache::load(&config.cache_path)
    } else {
        ResultCache::in_memory()
    };
    let finder = DealFinder::new(options);

    let outcome = if let Some(path) = &args.html_file {
        let source = FilePageSource::new(path);
        finder.run(&request, &source, &mut cache).await?
    } else {
        let source = HttpPageSource::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
        .context("failed to build HTTP client")?;
        finder.run(&request, &source, &mut cache).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!(
            "{}",
            report::render_outcome(&outcome, dealfinder_scraper::cache::now_epoch_secs())
        );
    }

    Ok(())
}
