//! The `cache` command.

use dealfinder_core::AppConfig;
use dealfinder_scraper::{build_key, ResultCache};

use crate::report;
use crate::CacheCommands;

pub(crate) fn run_cache_command(command: &CacheCommands, config: &AppConfig) -> anyhow::Result<()> {
    let mut cache = ResultCache::load(&config.cache_path);

    match command {
        CacheCommands::Show => {
            print!(
                "{}",
                report::render_cache_listing(
                    &cache.entries(),
                    config.cache_ttl_secs,
                    dealfinder_scraper::cache::now_epoch_secs(),
                )
            );
        }
        CacheCommands::Clear { store: Some(store) } => {
            let key = build_key(Some(store.as_str()));
            if cache.remove(&key) {
                cache.save()?;
                println!("removed cached snapshot for store {key}");
            } else {
                println!("no cached snapshot for store {key}");
            }
        }
        CacheCommands::Clear { store: None } => {
            let count = cache.entries().len();
            cache.clear();
            cache.save()?;
            println!("removed {count} cached snapshot(s)");
        }
    }

    Ok(())
}
