//! Runtime configuration passed explicitly into the scraper and query engine

use crate::models::LocationSource;
use std::path::PathBuf;

/// NHTSA vPIC vehicles endpoint
pub const DEFAULT_VIN_API_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";

/// The yard sites reject requests without a browser-like agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `{Location}_inventory.csv` per yard
    pub cache_dir: PathBuf,
    /// Yards to scrape and search, in report order
    pub locations: Vec<LocationSource>,
    pub vin_api_base_url: String,
    pub user_agent: String,
}

impl Config {
    /// Get the default cache directory
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yard_inventory")
            .join("data_cache")
    }

    /// The two Pull and Save yards
    pub fn default_locations() -> Vec<LocationSource> {
        vec![
            LocationSource::new(
                "Spokane",
                "https://newautopart.net/includes/pullandsave/spokane/yard_locationslist.php",
            ),
            LocationSource::new(
                "Mead",
                "https://newautopart.net/includes/pullandsave/mead/yard_locationslist.php",
            ),
        ]
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: Self::default_cache_dir(),
            locations: Self::default_locations(),
            vin_api_base_url: DEFAULT_VIN_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_two_yards() {
        let config = Config::default();
        let names: Vec<_> = config.locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Spokane", "Mead"]);
        assert_eq!(config.vin_api_base_url, DEFAULT_VIN_API_BASE_URL);
    }

    #[test]
    fn test_default_cache_dir_ends_with_data_cache() {
        assert!(Config::default_cache_dir().ends_with("yard_inventory/data_cache"));
    }

    #[test]
    fn test_with_cache_dir_overrides() {
        let config = Config::default().with_cache_dir("/tmp/yards");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/yards"));
    }
}
