use crate::error::{ApiError, ApiResult};
use crate::models::{round_liters, EngineInfo};
use serde::Deserialize;

const DISPLACEMENT_VARIABLE: &str = "Displacement (L)";
const CYLINDERS_VARIABLE: &str = "Engine Number of Cylinders";
const ENGINE_MODEL_VARIABLE: &str = "Engine Model";

/// One `{Variable, Value}` pair from a decodevin response
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DecodedVariable {
    #[serde(rename = "Variable", default)]
    pub variable: String,
    #[serde(rename = "Value", default)]
    pub value: Option<serde_json::Value>,
}

impl DecodedVariable {
    /// The value as text; `None` for null or empty values
    pub fn value_str(&self) -> Option<String> {
        let text = match self.value.as_ref()? {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct DecodeResponse {
    #[serde(rename = "Results")]
    results: Option<Vec<DecodedVariable>>,
}

/// Blocking client for the NHTSA VIN decode endpoint.
/// One request per VIN, no caching, no retry.
pub struct VinDecoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl VinDecoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        log::debug!("Creating VIN decoder for {}", base_url);
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Decode a VIN into its list of variables
    pub fn decode(&self, vin: &str) -> ApiResult<Vec<DecodedVariable>> {
        let url = format!("{}/decodevin/{}?format=json", self.base_url, vin.trim());

        log::debug!("Decoding VIN: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "yard-inventory/0.1")
            .send()?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        let body = response.text()?;
        let decoded: DecodeResponse = serde_json::from_str(&body)?;
        decoded.results.ok_or(ApiError::MissingResults)
    }

    /// Decode a VIN and pull out the engine attributes.
    /// Failures are logged and mean "no enrichment available".
    pub fn engine_info(&self, vin: &str) -> Option<EngineInfo> {
        match self.decode(vin) {
            Ok(results) => Some(EngineInfo {
                displacement_liters: extract_displacement(&results),
                cylinder_count: extract_cylinder_count(&results),
                engine_model: extract_engine_model(&results),
            }),
            Err(e) => {
                log::warn!("Failed to decode VIN {}: {}", vin, e);
                None
            }
        }
    }
}

fn find_variable<'a>(results: &'a [DecodedVariable], name: &str) -> Option<&'a DecodedVariable> {
    results.iter().find(|r| r.variable == name)
}

/// Displacement in liters rounded to one decimal, 0.0 when missing
pub fn extract_displacement(results: &[DecodedVariable]) -> f64 {
    find_variable(results, DISPLACEMENT_VARIABLE)
        .and_then(DecodedVariable::value_str)
        .and_then(|v| v.parse::<f64>().ok())
        .map(round_liters)
        .unwrap_or(0.0)
}

pub fn extract_cylinder_count(results: &[DecodedVariable]) -> Option<String> {
    find_variable(results, CYLINDERS_VARIABLE).and_then(DecodedVariable::value_str)
}

pub fn extract_engine_model(results: &[DecodedVariable]) -> Option<String> {
    find_variable(results, ENGINE_MODEL_VARIABLE).and_then(DecodedVariable::value_str)
}

#[cfg(test)]
#[path = "nhtsa_tests.rs"]
mod tests;
