//! Query parameters and the two-location query engine

use crate::api::VinDecoder;
use crate::cache::InventoryCache;
use crate::error::InventoryResult;
use crate::formatters::format_report;
use crate::models::{round_liters, to_tenths, InventoryRow};
use crate::store::InventoryStore;
use std::fmt;
use std::path::Path;

/// Inventory tag shared by Nissan and Datsun vehicles
pub const DATSUN_NISSAN: &str = "DATSUN - NISSAN";

/// Normalize a make to the yard's inventory tag.
///
/// Idempotent: `normalize_make(normalize_make(x)) == normalize_make(x)`.
pub fn normalize_make(make: &str) -> String {
    let make = make.trim().to_uppercase();
    match make.as_str() {
        "CHEVY" => "CHEVROLET".to_string(),
        "NISSAN" | "DATSUN" => DATSUN_NISSAN.to_string(),
        _ => make,
    }
}

pub fn normalize_model(model: &str) -> String {
    model.trim().to_uppercase()
}

/// Why a query was refused before touching any data
#[derive(Debug, Clone, PartialEq)]
pub enum QueryRejection {
    /// Displacement or cylinders given without a make
    EngineWithoutMake,
    InvalidYear(String),
    InvalidDisplacement(String),
}

impl fmt::Display for QueryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryRejection::EngineWithoutMake => write!(
                f,
                "Invalid search parameters: a make is required when searching by displacement or cylinders"
            ),
            QueryRejection::InvalidYear(raw) => {
                write!(f, "Invalid search parameters: year {:?} is not a number", raw)
            }
            QueryRejection::InvalidDisplacement(raw) => write!(
                f,
                "Invalid search parameters: displacement {:?} is not a number",
                raw
            ),
        }
    }
}

/// Normalized search parameters; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    year: Option<i32>,
    make: Option<String>,
    model: Option<String>,
    displacement_liters: Option<f64>,
    cylinder_count: Option<String>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_make(mut self, make: &str) -> Self {
        self.make = Some(normalize_make(make));
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(normalize_model(model));
        self
    }

    pub fn with_displacement(mut self, liters: f64) -> Self {
        self.displacement_liters = Some(round_liters(liters));
        self
    }

    pub fn with_cylinders(mut self, cylinders: &str) -> Self {
        self.cylinder_count = Some(cylinders.trim().to_string());
        self
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn make(&self) -> Option<&str> {
        self.make.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn displacement_liters(&self) -> Option<f64> {
        self.displacement_liters
    }

    pub(crate) fn displacement_tenths(&self) -> Option<i64> {
        self.displacement_liters.map(to_tenths)
    }

    pub fn cylinder_count(&self) -> Option<&str> {
        self.cylinder_count.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether matching requires decoding VINs
    pub fn needs_engine(&self) -> bool {
        self.displacement_liters.is_some() || self.cylinder_count.is_some()
    }

    pub fn validate(&self) -> Result<(), QueryRejection> {
        if self.needs_engine() && self.make.is_none() {
            return Err(QueryRejection::EngineWithoutMake);
        }
        Ok(())
    }

    /// Human description, e.g. `2004 SUBARU LEGACY 3.0L`
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(make) = &self.make {
            parts.push(make.clone());
        }
        if let Some(model) = &self.model {
            parts.push(model.clone());
        }
        if let Some(liters) = self.displacement_liters {
            parts.push(format!("{liters:.1}L"));
        }
        if let Some(cylinders) = &self.cylinder_count {
            parts.push(format!("{cylinders} cylinder"));
        }
        parts.join(" ")
    }
}

/// Raw text fields as typed by the user. Blank fields count as absent.
#[derive(Debug, Clone, Default)]
pub struct QueryInput {
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub displacement: Option<String>,
    pub cylinders: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl QueryInput {
    /// Parse and normalize into `QueryParameters`, validating the combination
    pub fn parse(&self) -> Result<QueryParameters, QueryRejection> {
        let mut params = QueryParameters::new();

        if let Some(year) = present(&self.year) {
            let year = year
                .parse::<i32>()
                .map_err(|_| QueryRejection::InvalidYear(year.to_string()))?;
            params = params.with_year(year);
        }
        if let Some(make) = present(&self.make) {
            params = params.with_make(make);
        }
        if let Some(model) = present(&self.model) {
            params = params.with_model(model);
        }
        if let Some(raw) = present(&self.displacement) {
            let liters = raw
                .trim_end_matches(['L', 'l'])
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|l| l.is_finite())
                .ok_or_else(|| QueryRejection::InvalidDisplacement(raw.to_string()))?;
            params = params.with_displacement(liters);
        }
        if let Some(cylinders) = present(&self.cylinders) {
            params = params.with_cylinders(cylinders);
        }

        params.validate()?;
        Ok(params)
    }
}

/// Matches in one location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationResult {
    pub location: String,
    pub rows: Vec<InventoryRow>,
}

impl LocationResult {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Tabular result of a query across both locations
#[derive(Debug, Clone, PartialEq)]
pub struct QueryReport {
    pub params: QueryParameters,
    pub locations: [LocationResult; 2],
}

impl QueryReport {
    pub fn total(&self) -> usize {
        self.locations.iter().map(LocationResult::count).sum()
    }

    pub fn render(&self) -> String {
        format_report(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rejected(QueryRejection),
    Found(QueryReport),
}

impl QueryOutcome {
    /// Display-ready text for either outcome
    pub fn render(&self) -> String {
        match self {
            QueryOutcome::Rejected(rejection) => rejection.to_string(),
            QueryOutcome::Found(report) => report.render(),
        }
    }
}

/// Two yard inventories searched as one
pub struct CombinedInventory {
    stores: [InventoryStore; 2],
    decoder: VinDecoder,
}

impl CombinedInventory {
    pub fn new(first: InventoryStore, second: InventoryStore, decoder: VinDecoder) -> Self {
        Self {
            stores: [first, second],
            decoder,
        }
    }

    /// Load two cache files by path
    pub fn from_files(first: &Path, second: &Path, decoder: VinDecoder) -> InventoryResult<Self> {
        Ok(Self::new(
            InventoryStore::load(first)?,
            InventoryStore::load(second)?,
            decoder,
        ))
    }

    /// Load two locations from the cache directory
    pub fn open(
        cache: &InventoryCache,
        first: &str,
        second: &str,
        decoder: VinDecoder,
    ) -> InventoryResult<Self> {
        Self::from_files(&cache.path(first), &cache.path(second), decoder)
    }

    pub fn stores(&self) -> &[InventoryStore; 2] {
        &self.stores
    }

    /// Number of VINs an engine query with these base parameters would send to the API
    pub fn count_for_engine_query(&self, params: &QueryParameters) -> usize {
        self.stores.iter().map(|store| store.count(params)).sum()
    }

    /// Run one query against both locations.
    ///
    /// Engine parameters trigger one VIN decode per base-filtered row.
    pub fn query(&self, params: &QueryParameters) -> QueryOutcome {
        if let Err(rejection) = params.validate() {
            log::warn!("Rejected query: {}", rejection);
            return QueryOutcome::Rejected(rejection);
        }

        if params.needs_engine() {
            log::info!(
                "Sending {} items to the NHTSA API. This may take a few moments...",
                self.count_for_engine_query(params)
            );
        }

        let [first, second] = &self.stores;
        let locations = [self.search_store(first, params), self.search_store(second, params)];

        QueryOutcome::Found(QueryReport {
            params: params.clone(),
            locations,
        })
    }

    fn search_store(&self, store: &InventoryStore, params: &QueryParameters) -> LocationResult {
        let rows = if params.needs_engine() {
            store.filter_with_engine(params, &self.decoder)
        } else {
            store.filter(params).cloned().map(InventoryRow::plain).collect()
        };
        log::debug!("{}: {} matches for {:?}", store.location(), rows.len(), params);
        LocationResult {
            location: store.location().to_string(),
            rows,
        }
    }
}
