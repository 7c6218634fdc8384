//! Dashboard configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::CityId;

/// Cities used when the city list file cannot be loaded.
pub const DEFAULT_CITY_IDS: [u64; 5] = [1248991, 1850147, 2644210, 2988507, 2147714];

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// OpenWeatherMap API key.
    #[serde(default)]
    pub openweather_api_key: String,

    /// OpenWeatherMap base URL (no trailing slash).
    #[serde(default = "default_base_url")]
    pub openweather_base_url: String,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the city list JSON file.
    #[serde(default = "default_cities_file")]
    pub cities_file: PathBuf,

    /// Upper bound on a single upstream fetch (seconds).
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://api.openweathermap.org".into()
}
fn default_port() -> u16 {
    5000
}
fn default_cities_file() -> PathBuf {
    PathBuf::from("cities.json")
}
fn default_fetch_timeout() -> u64 {
    10
}

pub fn default_city_ids() -> Vec<CityId> {
    DEFAULT_CITY_IDS.iter().copied().map(CityId).collect()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: String::new(),
            openweather_base_url: default_base_url(),
            port: default_port(),
            cities_file: default_cities_file(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}
