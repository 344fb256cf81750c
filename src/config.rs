//! Service configuration loaded from an optional TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::eligibility::FundingRule;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    pub geocoder: GeocoderSettings,
    pub funding: FundingSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetSettings {
    pub path: PathBuf,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/regions.geojson"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderSettings {
    /// Nominatim-compatible search endpoint
    pub url: String,
    /// Whole-request timeout
    pub timeout_ms: u64,
    pub user_agent: String,
    /// ISO 3166-1 alpha-2 codes restricting the search; empty for worldwide
    pub country_codes: Vec<String>,
    pub max_results: u32,
    /// Display-name parts dropped when shortening an address, compared
    /// case-insensitively
    pub omit_from_display: Vec<String>,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout_ms: 10_000,
            user_agent: concat!("regionfund/", env!("CARGO_PKG_VERSION")).to_string(),
            country_codes: vec!["ca".to_string()],
            max_results: 1,
            omit_from_display: vec!["Ontario".to_string(), "ON".to_string(), "Canada".to_string()],
        }
    }
}

/// Funding policy override. Without rules the built-in policy applies.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FundingSettings {
    pub rules: Option<Vec<FundingRule>>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}
