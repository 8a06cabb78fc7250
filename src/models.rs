use serde::{Deserialize, Serialize};

/// Column headers of a cache file, in order
pub const CSV_HEADERS: [&str; 5] = ["Row", "Vin", "Year", "Make", "Model"];

/// One row of yard inventory as scraped from the listing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "Row")]
    pub row_number: u32,
    #[serde(rename = "Vin")]
    pub vin: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
}

/// Engine attributes decoded from a VIN. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    pub displacement_liters: f64,
    pub cylinder_count: Option<String>,
    pub engine_model: Option<String>,
}

impl EngineInfo {
    /// Displacement in tenths of a liter, the precision used for matching
    pub fn displacement_tenths(&self) -> i64 {
        to_tenths(self.displacement_liters)
    }
}

/// A vehicle together with its engine attributes, when enrichment ran
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub record: VehicleRecord,
    pub engine: Option<EngineInfo>,
}

impl InventoryRow {
    pub fn plain(record: VehicleRecord) -> Self {
        Self {
            record,
            engine: None,
        }
    }
}

/// A yard location and the listing page it is scraped from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSource {
    pub name: String,
    pub listing_url: String,
}

impl LocationSource {
    pub fn new(name: impl Into<String>, listing_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listing_url: listing_url.into(),
        }
    }
}

/// Round a liter value to one decimal place
pub fn round_liters(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn to_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_liters() {
        assert_eq!(round_liters(2.457), 2.5);
        assert_eq!(round_liters(3.0), 3.0);
        assert_eq!(round_liters(1.94), 1.9);
    }

    #[test]
    fn test_displacement_tenths_matches_rounded_value() {
        let engine = EngineInfo {
            displacement_liters: 2.999,
            ..Default::default()
        };
        assert_eq!(engine.displacement_tenths(), 30);
    }

    #[test]
    fn test_plain_row_has_no_engine() {
        let row = InventoryRow::plain(VehicleRecord {
            row_number: 1,
            vin: "4S3BE686X47201234".to_string(),
            year: 2004,
            make: "SUBARU".to_string(),
            model: "LEGACY".to_string(),
        });
        assert!(row.engine.is_none());
    }
}
