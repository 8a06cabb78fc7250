//! Single-location inventory loaded from a cache file

use crate::api::VinDecoder;
use crate::cache::{location_from_file_name, read_inventory_file};
use crate::error::InventoryResult;
use crate::models::{EngineInfo, InventoryRow, VehicleRecord};
use crate::query::QueryParameters;
use std::path::Path;

pub struct InventoryStore {
    location: String,
    records: Vec<VehicleRecord>,
}

impl InventoryStore {
    pub fn new(location: impl Into<String>, records: Vec<VehicleRecord>) -> Self {
        Self {
            location: location.into(),
            records,
        }
    }

    /// Load a cache file; the location name comes from the file name
    pub fn load(path: &Path) -> InventoryResult<Self> {
        let records = read_inventory_file(path)?;
        let location = location_from_file_name(path);
        log::info!("Loaded {} vehicles for {}", records.len(), location);
        Ok(Self { location, records })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows matching the year, make and model of `params`; other fields are ignored
    pub fn filter<'a>(&'a self, params: &'a QueryParameters) -> impl Iterator<Item = &'a VehicleRecord> {
        self.records.iter().filter(move |r| base_matches(params, r))
    }

    /// Size of the base filter, i.e. the number of VINs an engine query would decode
    pub fn count(&self, params: &QueryParameters) -> usize {
        self.filter(params).count()
    }

    /// Base filter, then decode every surviving VIN and filter on engine attributes.
    /// Rows whose decode fails never match.
    pub fn filter_with_engine(
        &self,
        params: &QueryParameters,
        decoder: &VinDecoder,
    ) -> Vec<InventoryRow> {
        self.filter(params)
            .map(|record| InventoryRow {
                record: record.clone(),
                engine: decoder.engine_info(&record.vin),
            })
            .filter(|row| engine_matches(params, row.engine.as_ref()))
            .collect()
    }
}

fn base_matches(params: &QueryParameters, record: &VehicleRecord) -> bool {
    params.year().map_or(true, |year| record.year == year)
        && params.make().map_or(true, |make| record.make == make)
        && params.model().map_or(true, |model| record.model == model)
}

fn engine_matches(params: &QueryParameters, engine: Option<&EngineInfo>) -> bool {
    if !params.needs_engine() {
        return true;
    }
    let Some(engine) = engine else {
        return false;
    };
    params
        .displacement_tenths()
        .map_or(true, |tenths| engine.displacement_tenths() == tenths)
        && params
            .cylinder_count()
            .map_or(true, |cylinders| {
                engine.cylinder_count.as_deref().map(str::trim) == Some(cylinders)
            })
}
