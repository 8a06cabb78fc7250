//! Caller-facing operations. Everything returned here is ready to display;
//! failures come back as messages rather than errors.

use crate::api::VinDecoder;
use crate::cache::{location_from_file_name, InventoryCache};
use crate::config::Config;
use crate::error::{InventoryError, InventoryResult};
use crate::query::{CombinedInventory, QueryInput};
use crate::scrape::{ScrapeReport, YardScraper};

/// Scrape every configured location in turn, overwriting each cache file.
/// A failing location does not stop the others.
pub fn scrape_all_locations(
    config: &Config,
) -> InventoryResult<Vec<(String, InventoryResult<ScrapeReport>)>> {
    let cache = InventoryCache::new(&config.cache_dir);
    let scraper = YardScraper::new(&config.user_agent, cache)?;

    Ok(config
        .locations
        .iter()
        .map(|source| {
            let result = scraper.scrape(source);
            if let Err(e) = &result {
                log::error!("Scrape of {} failed: {}", source.name, e);
            }
            (source.name.clone(), result)
        })
        .collect())
}

/// One line per location summarizing a scrape run
pub fn format_scrape_results(results: &[(String, InventoryResult<ScrapeReport>)]) -> String {
    results
        .iter()
        .map(|(location, result)| match result {
            Ok(report) => report.summary(),
            Err(e) => format!("{}: scrape failed: {}", location, e),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn missing_cache_message(location: &str) -> String {
    format!("No cached inventory for {}. Run a scrape first.", location)
}

fn load_error_message(e: &InventoryError) -> String {
    match e {
        InventoryError::MissingCache(path) => missing_cache_message(&location_from_file_name(path)),
        other => format!("Failed to load inventory: {}", other),
    }
}

/// Open the two configured locations from the cache directory
pub fn open_inventory(config: &Config) -> Result<CombinedInventory, String> {
    let [first, second] = config.locations.as_slice() else {
        return Err(format!(
            "Searching needs exactly two locations, {} configured",
            config.locations.len()
        ));
    };

    let cache = InventoryCache::new(&config.cache_dir);
    for location in [first, second] {
        if !cache.exists(&location.name) {
            return Err(missing_cache_message(&location.name));
        }
    }

    let decoder = VinDecoder::new(config.vin_api_base_url.as_str());
    CombinedInventory::open(&cache, &first.name, &second.name, decoder)
        .map_err(|e| load_error_message(&e))
}

/// Search both locations and return the report text
pub fn query(config: &Config, input: &QueryInput) -> String {
    let params = match input.parse() {
        Ok(params) => params,
        Err(rejection) => return rejection.to_string(),
    };
    match open_inventory(config) {
        Ok(inventory) => inventory.query(&params).render(),
        Err(message) => message,
    }
}

/// How many VINs an engine search would decode, reported before running it
pub fn count_for_engine_query(config: &Config, input: &QueryInput) -> Result<usize, String> {
    let params = input.parse().map_err(|r| r.to_string())?;
    let inventory = open_inventory(config)?;
    Ok(inventory.count_for_engine_query(&params))
}

/// Per-location cache state: row count and last refresh
pub fn cache_status(config: &Config) -> String {
    let cache = InventoryCache::new(&config.cache_dir);
    let mut lines = vec![format!("Cache directory: {}", cache.dir().display())];

    for location in &config.locations {
        let line = match (cache.read(&location.name), cache.refreshed_at(&location.name)) {
            (Ok(records), Some(refreshed)) => format!(
                "{}: {} vehicles, refreshed {}",
                location.name,
                records.len(),
                refreshed.format("%Y-%m-%d %H:%M:%S")
            ),
            (Ok(records), None) => format!("{}: {} vehicles", location.name, records.len()),
            (Err(InventoryError::MissingCache(_)), _) => {
                format!("{}: not cached yet", location.name)
            }
            (Err(e), _) => format!("{}: unreadable cache ({})", location.name, e),
        };
        lines.push(line);
    }

    lines.join("\n")
}
