//! Paginated scrape of a yard listing into the inventory cache

use crate::cache::InventoryCache;
use crate::error::{InventoryError, InventoryResult};
use crate::html::{parse_inventory_table, parse_page_count};
use crate::models::{LocationSource, VehicleRecord};
use std::path::PathBuf;

/// Rows per listing page; the `start` offset advances by this much
pub const PAGE_SIZE: u32 = 50;

/// URL of a listing page. Offsets are 1-based: 1, 51, 101, ...
pub fn page_url(listing_url: &str, page_index: u32) -> String {
    let start = 1 + u64::from(page_index) * u64::from(PAGE_SIZE);
    format!("{}?start={}", listing_url, start)
}

/// A listing page that was skipped
#[derive(Debug)]
pub struct PageFailure {
    pub url: String,
    pub error: InventoryError,
}

impl PageFailure {
    /// True for transport or status failures, false for unexpected HTML
    pub fn is_network(&self) -> bool {
        matches!(
            self.error,
            InventoryError::Network(_) | InventoryError::HttpStatus { .. }
        )
    }
}

/// Outcome of scraping one location
#[derive(Debug)]
pub struct ScrapeReport {
    pub location: String,
    pub page_count: u32,
    pub pages_scraped: u32,
    pub failed_pages: Vec<PageFailure>,
    pub rows_written: usize,
    pub cache_path: PathBuf,
}

impl ScrapeReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: scraped {} of {} pages, wrote {} rows to {}",
            self.location,
            self.pages_scraped,
            self.page_count,
            self.rows_written,
            self.cache_path.display()
        );
        for failure in &self.failed_pages {
            summary.push_str(&format!("\n    skipped {}: {}", failure.url, failure.error));
        }
        summary
    }
}

pub struct YardScraper {
    client: reqwest::blocking::Client,
    cache: InventoryCache,
}

impl YardScraper {
    pub fn new(user_agent: &str, cache: InventoryCache) -> InventoryResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, cache })
    }

    fn fetch(&self, url: &str) -> InventoryResult<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text()?)
    }

    fn scrape_page(&self, url: &str) -> InventoryResult<Vec<VehicleRecord>> {
        let body = self.fetch(url)?;
        parse_inventory_table(&body)
    }

    /// Scrape every page of a location and overwrite its cache file.
    ///
    /// Failing pages are logged and skipped, never retried.
    pub fn scrape(&self, source: &LocationSource) -> InventoryResult<ScrapeReport> {
        log::info!("Initializing request for {} location...", source.name);

        let first_page = self.fetch(&source.listing_url).inspect_err(|e| {
            log::error!("Initiation failed for {}: {}", source.name, e);
        })?;
        let page_count = parse_page_count(&first_page).inspect_err(|e| {
            log::error!("Could not read page count for {}: {}", source.name, e);
        })?;

        log::info!(
            "Scraping {} pages from the {} yard site",
            page_count,
            source.name
        );

        let mut records: Vec<VehicleRecord> = Vec::new();
        let mut failed_pages = Vec::new();
        let mut pages_scraped = 0;

        for page_index in 0..page_count {
            let url = page_url(&source.listing_url, page_index);
            match self.scrape_page(&url) {
                Ok(page) => {
                    log::debug!("Page {} of {}: {} rows", page_index + 1, page_count, page.len());
                    records.extend(page);
                    pages_scraped += 1;
                }
                Err(error) => {
                    log::warn!("Skipping page {}: {}", url, error);
                    failed_pages.push(PageFailure { url, error });
                }
            }
        }

        if page_count > 0 && pages_scraped == 0 {
            return Err(InventoryError::NoPagesScraped {
                location: source.name.clone(),
                pages: page_count,
            });
        }

        let cache_path = self.cache.write(&source.name, &records)?;

        log::info!(
            "Data written to {} ({} rows). {} initiation complete!",
            cache_path.display(),
            records.len(),
            source.name
        );

        Ok(ScrapeReport {
            location: source.name.clone(),
            page_count,
            pages_scraped,
            failed_pages,
            rows_written: records.len(),
            cache_path,
        })
    }
}

#[cfg(test)]
#[path = "scrape_tests.rs"]
mod tests;
