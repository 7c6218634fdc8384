//! City list source.
//!
//! Reads the list of city codes from a JSON file on every call so edits take
//! effect without a restart. Falls back to a fixed set of cities when the
//! file cannot be used.

use std::path::{Path, PathBuf};

use common::config::default_city_ids;
use common::{CityCode, CityId, Error};
use serde::Deserialize;
use tracing::{debug, warn};

/// Shape of the city list file: `{"List": [{"CityCode": "1248991", ...}]}`.
#[derive(Debug, Deserialize)]
struct CityListDocument {
    #[serde(rename = "List")]
    list: Vec<CityListing>,
}

#[derive(Debug, Deserialize)]
struct CityListing {
    #[serde(rename = "CityCode", default)]
    city_code: serde_json::Value,
    #[serde(rename = "CityName", default)]
    city_name: Option<String>,
}

impl CityListing {
    /// Leading-integer reading of `CityCode`: `"2644210x"` and `2644210.0`
    /// both give 2644210. Anything without a non-negative integer prefix is
    /// kept as [`CityCode::Invalid`].
    fn city_code(&self) -> CityCode {
        let id = match &self.city_code {
            serde_json::Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                    .map(|f| f.trunc() as u64)
            }),
            serde_json::Value::String(s) => leading_u64(s),
            _ => None,
        };

        match id {
            Some(id) => CityCode::Id(CityId(id)),
            None => {
                warn!(
                    "City {:?} has invalid CityCode {}",
                    self.city_name.as_deref().unwrap_or("?"),
                    self.city_code
                );
                CityCode::Invalid(self.city_code.to_string())
            }
        }
    }
}

fn leading_u64(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}

/// City codes backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct CityListFile {
    path: PathBuf,
}

impl CityListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One code per listing in the file, or the built-in defaults if the
    /// file can't be loaded.
    pub async fn city_codes(&self) -> Vec<CityCode> {
        match self.load_codes().await {
            Ok(codes) => {
                debug!("Loaded {} cities from {}", codes.len(), self.path.display());
                codes
            }
            Err(e) => {
                warn!(
                    "Could not load {} ({}); using default cities",
                    self.path.display(),
                    e
                );
                default_city_ids().into_iter().map(CityCode::Id).collect()
            }
        }
    }

    /// Parse city codes from the file, failing if it is missing or malformed.
    pub async fn load_codes(&self) -> Result<Vec<CityCode>, Error> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        parse_city_codes(&contents)
    }

    /// The file as parsed JSON, unmodified.
    pub async fn load_raw(&self) -> Result<serde_json::Value, Error> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Extract one city code per listing from a city list document.
pub fn parse_city_codes(contents: &str) -> Result<Vec<CityCode>, Error> {
    let doc: CityListDocument = serde_json::from_str(contents)
        .map_err(|e| Error::CityList(format!("invalid city list: {e}")))?;

    Ok(doc.list.iter().map(CityListing::city_code).collect())
}
