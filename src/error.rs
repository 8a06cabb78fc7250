use std::fmt;
use std::path::PathBuf;

/// Error type for VIN decode API calls
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// Response body had no `Results` array
    MissingResults,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Parse(e) => write!(f, "Parse error: {}", e),
            ApiError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            ApiError::MissingResults => write!(f, "VIN decoding failed: no results in response"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            ApiError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err)
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type for scraping and cache operations
#[derive(Debug)]
pub enum InventoryError {
    /// HTTP request failed before a response arrived
    Network(reqwest::Error),
    /// Yard site answered with a non-success status
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Page HTML did not have the expected structure
    Html(String),
    /// Cache file could not be read or written as CSV
    Csv(csv::Error),
    /// File I/O error
    Io(std::io::Error),
    /// No cache file exists for a location yet
    MissingCache(PathBuf),
    /// Every page of a location failed, nothing to write
    NoPagesScraped { location: String, pages: u32 },
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::Network(e) => write!(f, "Network error: {}", e),
            InventoryError::HttpStatus { url, status } => {
                write!(f, "Failed to fetch data from {}: HTTP {}", url, status)
            }
            InventoryError::Html(msg) => write!(f, "HTML parse error: {}", msg),
            InventoryError::Csv(e) => write!(f, "CSV error: {}", e),
            InventoryError::Io(e) => write!(f, "I/O error: {}", e),
            InventoryError::MissingCache(path) => {
                write!(f, "No cached inventory at {}", path.display())
            }
            InventoryError::NoPagesScraped { location, pages } => write!(
                f,
                "All {} pages failed for {}, cache left unchanged",
                pages, location
            ),
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Network(e) => Some(e),
            InventoryError::Csv(e) => Some(e),
            InventoryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        InventoryError::Network(err)
    }
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Csv(err)
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err)
    }
}

/// Result alias for scrape and cache operations
pub type InventoryResult<T> = Result<T, InventoryError>;
