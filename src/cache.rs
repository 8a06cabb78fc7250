//! On-disk cache of scraped inventory, one CSV file per location

use crate::error::{InventoryError, InventoryResult};
use crate::models::{VehicleRecord, CSV_HEADERS};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Cache directory holding `{Location}_inventory.csv` files.
/// Files are written and read wholesale; there is no locking.
#[derive(Debug, Clone)]
pub struct InventoryCache {
    cache_dir: PathBuf,
}

impl InventoryCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File name for a location's cache
    pub fn file_name(location: &str) -> String {
        format!("{}_inventory.csv", location)
    }

    pub fn path(&self, location: &str) -> PathBuf {
        self.cache_dir.join(Self::file_name(location))
    }

    pub fn exists(&self, location: &str) -> bool {
        self.path(location).is_file()
    }

    /// Overwrite a location's cache with the given records
    pub fn write(&self, location: &str, records: &[VehicleRecord]) -> InventoryResult<PathBuf> {
        std::fs::create_dir_all(&self.cache_dir)?;

        let path = self.path(location);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(CSV_HEADERS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        log::debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(path)
    }

    /// Read a location's cache
    pub fn read(&self, location: &str) -> InventoryResult<Vec<VehicleRecord>> {
        read_inventory_file(&self.path(location))
    }

    /// Modification time of a location's cache file, if it exists
    pub fn refreshed_at(&self, location: &str) -> Option<DateTime<Local>> {
        let modified = std::fs::metadata(self.path(location)).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified))
    }
}

/// Read a cache file from any path
pub fn read_inventory_file(path: &Path) -> InventoryResult<Vec<VehicleRecord>> {
    if !path.is_file() {
        return Err(InventoryError::MissingCache(path.to_path_buf()));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: VehicleRecord = result?;
        records.push(record);
    }

    Ok(records)
}

/// Location identifier from a cache file name: the prefix before the
/// first `_` or `-`, e.g. `Spokane_inventory.csv` -> `Spokane`.
pub fn location_from_file_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.split(['_', '-']).next().unwrap_or_default().to_string()
}
