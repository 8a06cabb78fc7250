pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod formatters;
pub mod html;
pub mod models;
pub mod query;
pub mod scrape;
pub mod service;
pub mod store;
pub mod worker;

// Re-export commonly used items
pub use api::VinDecoder;
pub use cache::InventoryCache;
pub use config::Config;
pub use error::{ApiError, ApiResult, InventoryError, InventoryResult};
pub use models::{EngineInfo, InventoryRow, LocationSource, VehicleRecord};
pub use query::{CombinedInventory, QueryInput, QueryOutcome, QueryParameters, QueryRejection};
pub use scrape::{ScrapeReport, YardScraper};
pub use service::{cache_status, count_for_engine_query, query, scrape_all_locations};
pub use store::InventoryStore;
pub use worker::{JobOutput, Worker};
